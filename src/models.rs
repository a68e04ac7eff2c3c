use serde::Serialize;

/// Optional position of a tag within a broadcast, in seconds.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_end: Option<f64>,
}

// ---------------------------------------------------------------------------
// Request bodies (not part of the public API surface)
// ---------------------------------------------------------------------------

/// POST /broadcasts body for clip creation.
#[derive(Serialize)]
pub(crate) struct CreateClipRequest<'a> {
    pub source: ClipSource<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClipSource<'a> {
    pub broadcast_id: &'a str,
    pub start: f64,
    pub end: f64,
}

/// POST /broadcasts/{id}/tags body.
#[derive(Serialize)]
pub(crate) struct AddTagRequest<'a> {
    pub text: &'a str,
    #[serde(flatten)]
    pub position: TagOptions,
}

use logfield_engine::DispatchError;

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("config ({path}): {detail}")]
    Config { path: String, detail: String },

    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("sample: {0}")]
    Net(#[from] logfield_catalog::NetError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Best-effort caller details captured by the transport adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

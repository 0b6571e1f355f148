use geodid_types::GeoDid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The hierarchy collaborator could not produce a document.
    #[error("hierarchy error: {0}")]
    Hierarchy(String),

    #[error("config error: {0}")]
    Config(String),

    /// A `DocumentInfo` whose identifier disagrees with its document.
    #[error("identifier mismatch: info names {geodid}, document is {document}")]
    IdentifierMismatch { geodid: GeoDid, document: GeoDid },

    #[error("type error: {0}")]
    Type(#[from] geodid_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] geodid_store::StoreError),

    #[error("registry error: {0}")]
    Registry(#[from] geodid_registry::RegistryError),

    #[error("resolve error: {0}")]
    Resolve(#[from] geodid_resolver::ResolveError),

    #[error("attach error: {0}")]
    Attach(#[from] geodid_assets::AttachError),
}

pub type SdkResult<T> = Result<T, SdkError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CharFreqError>;

#[derive(Error, Debug)]
pub enum CharFreqError {
    #[error("Clone of {url} failed: {reason}")]
    Clone { url: String, reason: String },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Store error: {0}")]
    Store(String),
    #[error("No store location configured")]
    NoStore,
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<ureq::Error> for CharFreqError {
    fn from(err: ureq::Error) -> Self {
        CharFreqError::Http(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for CharFreqError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        CharFreqError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for CharFreqError {
    fn from(err: gix::object::commit::Error) -> Self {
        CharFreqError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for CharFreqError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        CharFreqError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for CharFreqError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        CharFreqError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for CharFreqError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        CharFreqError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for CharFreqError {
    fn from(err: gix::objs::decode::Error) -> Self {
        CharFreqError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for CharFreqError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        CharFreqError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::discover::Error> for CharFreqError {
    fn from(err: gix::discover::Error) -> Self {
        CharFreqError::GitDiscover(Box::new(err))
    }
}

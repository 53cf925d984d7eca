pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot lay out an empty graph")]
    EmptyGraph,

    #[error("layout produced an inconsistent state: {message}")]
    Inconsistent { message: String },
}

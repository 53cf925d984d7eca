pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown person id: {id}")]
    UnknownPerson { id: String },

    #[error("{target} already has a {slot} who is not a placeholder")]
    SlotOccupied { target: String, slot: &'static str },

    #[error("linking {id} as {rel} of {target} would make someone their own ancestor")]
    WouldCreateCycle {
        id: String,
        target: String,
        rel: &'static str,
    },

    #[error("gender of {id} is fixed by existing children")]
    GenderLocked { id: String },

    #[error("invalid relation: {message}")]
    InvalidRelation { message: String },
}

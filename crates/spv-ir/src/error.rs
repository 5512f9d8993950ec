use crate::ir::Id;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("function type {0} is not registered in the module")]
    UnregisteredType(Id),

    #[error("{0} does not name a function type instruction")]
    NotAFunctionType(Id),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerrainError {
    #[error("average range is inverted: {a} > {b}")]
    InvertedRange { a: i32, b: i32 },
    #[error("heightfield must have {expected} columns, got {actual}")]
    WrongWidth { expected: usize, actual: usize },
    #[error("height {height} at column {column} is outside the field")]
    HeightOutOfRange { column: usize, height: i16 },
}

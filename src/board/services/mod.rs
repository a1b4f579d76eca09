//! Orchestration services for the board.

mod board;

pub use board::{
    BoardError, BoardResult, BoardService, BoardState, CreateTaskRequest, PositionUpdate,
    TaskPatch,
};

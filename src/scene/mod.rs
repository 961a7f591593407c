mod arena;

pub use arena::populate_arena;

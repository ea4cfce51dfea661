mod state;
mod traced_dijkstra;

pub use traced_dijkstra::{TracedPath, dijkstra_path};

pub mod cluster;
pub mod dimension;
pub mod extract;
pub mod geom;
pub mod matching;
pub mod model;
pub mod report;
pub mod transform;

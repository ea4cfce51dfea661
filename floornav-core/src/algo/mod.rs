pub mod intersections;

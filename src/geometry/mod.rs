/// Projective transform between two quadrilaterals.
pub mod perspective;

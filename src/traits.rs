use crate::error::Result;
use crate::program::{ConicProgram, ProgramSolution};

/// Solver of conic programs with zero, nonnegative and rotated quadratic
/// cones.
///
/// Blocks until the solver returns. Any time limit belongs to the
/// implementation's own settings.
pub trait ConicSolver {
    fn solve(&self, program: &ConicProgram) -> Result<ProgramSolution>;
}

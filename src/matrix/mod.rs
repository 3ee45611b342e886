//! Matrix handles and the dense/sparse workloads

pub mod compare;
pub mod csr;
pub mod dense;
pub mod reference;
pub mod sparse;

pub use csr::SparseMatrixCSR;
pub use dense::DenseWorkload;
pub use reference::reference_spgemm;
pub use sparse::SparseWorkload;

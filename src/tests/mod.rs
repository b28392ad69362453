mod basic;
mod canonical;
mod collision;
mod completeness;
mod stress;
mod sync;
mod traits;

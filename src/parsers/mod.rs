pub mod gocover;

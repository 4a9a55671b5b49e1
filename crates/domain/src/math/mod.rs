pub mod bin_array;

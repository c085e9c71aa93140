pub mod display_interface;

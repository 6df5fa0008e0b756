pub mod life_path;

mod client;
mod custom_writer;
mod parallel_stress;

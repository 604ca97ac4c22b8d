mod relative_time;
mod typewriter_cycle;

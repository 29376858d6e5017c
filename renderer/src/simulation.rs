/// Game state advanced in fixed ticks by the shell.
pub trait Simulation {
    fn process_ticks(&mut self, ticks: u64);
}

/// Counts elapsed ticks. Stands in until real game logic exists.
#[derive(Debug, Default)]
pub struct Game {
    elapsed_ticks: u64,
}

impl Game {
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }
}

impl Simulation for Game {
    fn process_ticks(&mut self, ticks: u64) {
        if ticks == 0 {
            return;
        }
        self.elapsed_ticks += ticks;
    }
}

#![windows_subsystem = "windows"]

#[cfg(any(windows, test))]
use std::time::{Duration, Instant};

#[cfg(windows)]
const TICK_RATE: u32 = 60;

#[cfg(any(windows, test))]
#[derive(Clone, Debug, Default)]
pub struct CommandLine {
    pub use_warp_device: bool,
}

#[cfg(windows)]
pub fn build_command_line() -> CommandLine {
    parse_command_line(std::env::args())
}

#[cfg(any(windows, test))]
fn parse_command_line(args: impl IntoIterator<Item = String>) -> CommandLine {
    let mut use_warp_device = false;

    for arg in args {
        if arg.eq_ignore_ascii_case("-warp") || arg.eq_ignore_ascii_case("/warp") {
            use_warp_device = true;
        }
    }

    CommandLine { use_warp_device }
}

/// Turns wall-clock time into whole simulation ticks, carrying the remainder.
#[cfg(any(windows, test))]
struct TickClock {
    tick: Duration,
    last: Instant,
    carry: Duration,
}

#[cfg(any(windows, test))]
impl TickClock {
    fn new(rate: u32, now: Instant) -> Self {
        Self {
            tick: Duration::from_secs(1) / rate,
            last: now,
            carry: Duration::ZERO,
        }
    }

    fn advance(&mut self, now: Instant) -> u64 {
        self.carry += now.saturating_duration_since(self.last);
        self.last = now;

        let ticks = self.carry.as_nanos() / self.tick.as_nanos();
        self.carry -= self.tick * ticks as u32;
        ticks as u64
    }
}

#[cfg(windows)]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use common::os::{App, WindowEvent};
    use log::{debug, info};
    use renderer::{d3d12::D3D12, Game, Renderer, RendererConfig};

    let command_line = build_command_line();
    let mut config = RendererConfig::load_or_default("renderer.toml")?;
    config.use_warp_device |= command_line.use_warp_device;

    let mut title = "Hello Cube".to_string();
    if config.use_warp_device {
        title.push_str(" (WARP)");
    }

    let (mut app, mut window) = App::init(title, (800, 600))?;
    let (width, height) = window.get_physical_size();

    let mut renderer = Renderer::initialize(
        D3D12,
        config,
        window.get_handle(),
        width as u32,
        height as u32,
        Some(Box::new(Game::default())),
    )?;

    let mut clock = TickClock::new(TICK_RATE, Instant::now());

    // Run main loop.
    while app.run() {
        for event in window.take_events() {
            match event {
                WindowEvent::Resized { width, height } => renderer.resize(width, height)?,
                WindowEvent::KeyDown(key) => debug!("unhandled key {key}"),
            }
        }

        renderer.advance_ticks(clock.advance(Instant::now()));

        if window.is_minimized() {
            std::thread::sleep(Duration::from_millis(10));
            continue;
        }

        renderer.render_frame()?;
    }

    info!("shutting down");
    std::mem::drop(renderer);

    D3D12::report_live_objects();

    Ok(())
}

#[cfg(windows)]
fn main() {
    if let Err(e) = common::util::init_logging(log::LevelFilter::Debug) {
        common::util::print_debug_string(&format!("failed to install logger: {e}\n"));
    }

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn main() {
    env_logger::init();
    log::error!("hello_cube needs Direct3D 12 and only runs on Windows");
    std::process::exit(1);
}

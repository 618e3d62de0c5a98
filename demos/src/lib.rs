//! Terminal playback of maze carving and Jump Point Search.
//!
//! The library half holds the command-line configuration, the text
//! rendering of a frame, and a crossterm-backed [`Player`] that paces the
//! snapshot iterators produced by `labyrinth-gen` and `labyrinth-paths`.

use std::error::Error;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor, execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use labyrinth_core::{Grid, Point};
use labyrinth_gen::MazeGen;
use labyrinth_paths::{Search, SearchStep};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Command-line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "labyrinth", about = "Carve a perfect maze and solve it with Jump Point Search")]
pub struct Args {
    /// Maze width in logical cells.
    #[arg(long, default_value_t = 20)]
    pub width: i32,

    /// Maze height in logical cells.
    #[arg(long, default_value_t = 10)]
    pub height: i32,

    /// RNG seed; a random one is drawn when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start position as `x,y` in grid coordinates (default: top-left cell).
    #[arg(long, value_parser = parse_point)]
    pub start: Option<Point>,

    /// Goal position as `x,y` in grid coordinates (default: bottom-right cell).
    #[arg(long, value_parser = parse_point)]
    pub end: Option<Point>,

    /// Play every intermediate frame instead of printing the result only.
    #[arg(long)]
    pub animate: bool,

    /// Delay between drawn frames, in milliseconds.
    #[arg(long, default_value_t = 15)]
    pub frame_ms: u64,

    /// Snapshots consumed per drawn frame.
    #[arg(long, default_value_t = 8)]
    pub steps_per_frame: usize,
}

/// Parse `x,y` into a [`Point`].
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(Point::new(x, y))
}

/// Draw a grid with an optional search overlay.
///
/// Walls are `█`, expanded points `+`, path cells `*`, endpoints `S`/`E`.
pub fn render(grid: &Grid, step: Option<&SearchStep>, ends: Option<(Point, Point)>) -> String {
    let mut canvas: Vec<Vec<char>> = grid
        .rows()
        .iter()
        .map(|row| row.iter().map(|&open| if open { ' ' } else { '█' }).collect())
        .collect();
    let mut put = |p: Point, ch: char| {
        if grid.contains(p) {
            canvas[p.y as usize][p.x as usize] = ch;
        }
    };
    if let Some(step) = step {
        for &p in &step.trace {
            put(p, '+');
        }
        for &p in step.path.iter().flatten() {
            put(p, '*');
        }
    }
    if let Some((start, end)) = ends {
        put(start, 'S');
        put(end, 'E');
    }
    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes frames to a terminal, clearing the screen between them.
pub struct Player<W: Write> {
    out: W,
    delay: Duration,
    every: usize,
}

impl<W: Write> Player<W> {
    pub fn new(out: W, delay: Duration, every: usize) -> Self {
        Self {
            out,
            delay,
            every: every.max(1),
        }
    }

    /// Draw one frame immediately.
    pub fn draw(&mut self, frame: &str) -> io::Result<()> {
        execute!(
            self.out,
            cursor::MoveTo(0, 0),
            Clear(ClearType::All),
            Print(frame.replace('\n', "\r\n")),
            Print("\r\n")
        )?;
        self.out.flush()?;
        thread::sleep(self.delay);
        Ok(())
    }

    /// Consume `frames`, drawing every `every`-th one and always the last.
    /// Returns the last item, if any.
    pub fn play<T>(
        &mut self,
        frames: impl Iterator<Item = T>,
        mut show: impl FnMut(&T) -> String,
    ) -> io::Result<Option<T>> {
        let mut last = None;
        let mut drawn = false;
        for (i, item) in frames.enumerate() {
            drawn = i % self.every == 0;
            if drawn {
                self.draw(&show(&item))?;
            }
            last = Some(item);
        }
        if let Some(item) = last.as_ref().filter(|_| !drawn) {
            self.draw(&show(item))?;
        }
        Ok(last)
    }
}

/// Carve a maze and solve it as configured by `args`, writing to stdout.
pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "carving {}x{} maze with seed {seed}",
        args.width, args.height
    );
    let mut generator = MazeGen::new(StdRng::seed_from_u64(seed));
    let stdout = io::stdout();
    let mut player = Player::new(
        stdout.lock(),
        Duration::from_millis(args.frame_ms),
        args.steps_per_frame,
    );

    let maze = if args.animate {
        let carving = generator.generate(args.width, args.height);
        // the last view is the finished maze
        player
            .play(carving, |g| render(g, None, None))?
            .map(|g| g.snapshot())
            .unwrap_or_else(|| Grid::new(0, 0))
    } else {
        generator.build(args.width, args.height)
    };

    let start = args.start.unwrap_or(Point::new(1, 1));
    let end = args
        .end
        .unwrap_or(Point::new(maze.width() - 2, maze.height() - 2));
    let ends = Some((start, end));
    info!("searching from {start} to {end}");

    let mut search = Search::new(&maze, start, end);
    let last = if args.animate {
        player.play(search.by_ref(), |s| render(&maze, Some(s), ends))?
    } else {
        search.by_ref().last()
    };
    let Some(last) = last else {
        return Ok(());
    };

    let route = last.route().unwrap_or_else(|| vec![end]);
    if !args.animate {
        player.draw(&render(&maze, Some(&last), ends))?;
    }
    info!(
        "{:?}: expanded {} points, path of {} cells",
        search.outcome(),
        last.trace.len(),
        route.len()
    );
    drop(player);
    if route.len() == 1 && start != end {
        println!("no path from {start} to {end}");
    } else {
        println!("path of {} cells from {start} to {end}", route.len());
    }
    Ok(())
}

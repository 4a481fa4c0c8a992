//! Decorative background: flat fill, breathing gradient, or drifting
//! particles. Shares no state with the clock loop.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::options::BackgroundMode;
use crate::task::{RepeatingTask, TaskHandle};

const MAX_PARTICLES: usize = 120;
const AREA_PER_PARTICLE: f32 = 40_000.0;
const WRAP_MARGIN: f32 = 20.0;
const GRADIENT_RATE_PER_MS: f64 = 0.000_06;

pub const BASE_FILL: Rgba = Rgba::opaque(3, 4, 10);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Logical viewport size plus the device pixel ratio it is shown at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixels_per_point: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub hue: f32,
}

impl Particle {
    pub fn color(&self) -> Rgba {
        hsla(self.hue, 0.6, 0.6, 0.12)
    }
}

pub fn particle_count(viewport: &Viewport) -> usize {
    let area = (viewport.width * viewport.height).max(0.0);
    ((area / AREA_PER_PARTICLE).floor() as usize).min(MAX_PARTICLES)
}

#[derive(Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn reinitialize(&mut self, viewport: &Viewport, rng: &mut impl Rng) {
        let count = particle_count(viewport);
        self.particles.clear();
        self.particles.extend((0..count).map(|_| Particle {
            x: rng.gen_range(0.0..viewport.width.max(1.0)),
            y: rng.gen_range(0.0..viewport.height.max(1.0)),
            vx: rng.gen_range(-0.1..0.1),
            vy: rng.gen_range(-0.1..0.1),
            radius: rng.gen_range(0.8..3.0),
            hue: rng.gen_range(200.0..260.0),
        }));
        tracing::debug!(
            count,
            width = viewport.width,
            height = viewport.height,
            "particles reinitialized"
        );
    }

    /// Moves every particle by its velocity, wrapping past the margin.
    pub fn advance(&mut self, viewport: &Viewport) {
        for particle in &mut self.particles {
            particle.x = wrap(particle.x + particle.vx, viewport.width);
            particle.y = wrap(particle.y + particle.vy, viewport.height);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

fn wrap(position: f32, extent: f32) -> f32 {
    if position < -WRAP_MARGIN {
        extent + WRAP_MARGIN
    } else if position > extent + WRAP_MARGIN {
        -WRAP_MARGIN
    } else {
        position
    }
}

/// Diagonal gradient endpoints at `elapsed`; a pure function of time.
pub fn gradient_colors(elapsed: Duration) -> (Rgba, Rgba) {
    let t = elapsed.as_secs_f64() * 1_000.0 * GRADIENT_RATE_PER_MS;
    let a = (t.sin() * 0.5 + 0.5) as f32;
    (
        Rgba {
            r: 10,
            g: 18,
            b: 48,
            a: 0.9 - a * 0.06,
        },
        Rgba {
            r: 4,
            g: 10,
            b: 30,
            a: 0.9 - (1.0 - a) * 0.06,
        },
    )
}

#[derive(Debug, PartialEq)]
pub enum BackgroundFrame<'a> {
    Flat(Rgba),
    Gradient { start: Rgba, end: Rgba },
    Particles { base: Rgba, particles: &'a [Particle] },
}

pub struct BackgroundAnimator {
    task: RepeatingTask,
    mode: BackgroundMode,
    viewport: Option<Viewport>,
    field: ParticleField,
    rng: StdRng,
}

impl BackgroundAnimator {
    pub fn spawn(mode: BackgroundMode) -> (Self, TaskHandle) {
        Self::spawn_with_rng(mode, StdRng::from_entropy())
    }

    pub fn spawn_with_rng(mode: BackgroundMode, rng: StdRng) -> (Self, TaskHandle) {
        let (task, handle) = RepeatingTask::spawn("background");
        let animator = Self {
            task,
            mode,
            viewport: None,
            field: ParticleField::default(),
            rng,
        };
        (animator, handle)
    }

    /// Advances one refresh. A changed viewport or mode rebuilds the
    /// particle set before drawing. Returns `None` once cancelled.
    pub fn step(
        &mut self,
        mode: BackgroundMode,
        viewport: Viewport,
        elapsed: Duration,
    ) -> Option<BackgroundFrame<'_>> {
        if !self.task.poll() {
            return None;
        }

        let resized = self.viewport != Some(viewport);
        let switched = self.mode != mode;
        self.viewport = Some(viewport);
        self.mode = mode;
        if mode == BackgroundMode::Particles && (resized || switched) {
            self.field.reinitialize(&viewport, &mut self.rng);
        }

        Some(match mode {
            BackgroundMode::Off => BackgroundFrame::Flat(BASE_FILL),
            BackgroundMode::Gradient => {
                let (start, end) = gradient_colors(elapsed);
                BackgroundFrame::Gradient { start, end }
            }
            BackgroundMode::Particles => {
                self.field.advance(&viewport);
                BackgroundFrame::Particles {
                    base: BASE_FILL,
                    particles: self.field.particles(),
                }
            }
        })
    }
}

/// HSL (hue in degrees, saturation and lightness in 0..=1) to RGB.
pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Rgba {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let to_byte = |channel: f32| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba {
        r: to_byte(r),
        g: to_byte(g),
        b: to_byte(b),
        a: alpha,
    }
}

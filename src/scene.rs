//! Scene builder and the window event loop.
//!
//! [`Scene`] collects construction parameters and [`Scene::run`] opens the
//! window. The per-frame logic that does not touch the GPU lives in
//! [`SceneState`] so it can be driven headless.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::accent::Accents;
use crate::config::TreeConfig;
use crate::error::SceneError;
use crate::foliage::{FoliageBuffers, FoliageParticle};
use crate::gpu::{Camera, FrameData, GpuState, OverlayPass};
use crate::input::{Action, Input};
use crate::ornament::{OrnamentField, OrnamentFrame};
use crate::time::FrameClock;
use crate::transition::{TransitionController, TreeState};

#[cfg(feature = "egui")]
use crate::gpu::EguiOverlay;

/// CPU side of the scene: ornaments, accents and the shared transition.
///
/// Foliage is not kept here; its buffers are static and live on the GPU.
#[derive(Debug, Clone)]
pub struct SceneState {
    config: TreeConfig,
    ornaments: OrnamentField,
    frame: OrnamentFrame,
    accents: Accents,
    transition: TransitionController,
}

impl SceneState {
    pub fn generate<R: Rng + ?Sized>(config: TreeConfig, rng: &mut R) -> Self {
        let ornaments = OrnamentField::generate(&config, rng);
        let frame = ornaments.new_frame();
        let mut state = Self {
            config,
            ornaments,
            frame,
            accents: Accents::default(),
            transition: TransitionController::new(config.smoothing_rate),
        };
        state.ornaments.update(0.0, 0.0, &mut state.frame);
        state
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn ornaments(&self) -> &OrnamentField {
        &self.ornaments
    }

    /// Instances written by the last [`step`](Self::step).
    pub fn frame(&self) -> &OrnamentFrame {
        &self.frame
    }

    pub fn accents(&self) -> &Accents {
        &self.accents
    }

    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub fn progress(&self) -> f32 {
        self.transition.progress()
    }

    pub fn tree_state(&self) -> TreeState {
        self.transition.state()
    }

    pub fn set_state(&mut self, state: TreeState) {
        self.transition.set_state(state);
    }

    pub fn toggle(&mut self) -> TreeState {
        self.transition.toggle()
    }

    /// Advance one frame at animation time `time` and return the new progress.
    pub fn step(&mut self, time: f32) -> f32 {
        let progress = self.transition.tick();
        self.ornaments.update(progress, time, &mut self.frame);
        self.accents = Accents::at(&self.config, progress, time);
        progress
    }
}

/// Builder for the windowed scene.
///
/// ```ignore
/// Scene::new()
///     .with_foliage_count(300_000)
///     .with_seed(7)
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct Scene {
    config: TreeConfig,
    seed: Option<u64>,
    title: String,
    initial_state: TreeState,
}

impl Scene {
    /// A scene with the default tree, unseeded, starting dispersed.
    pub fn new() -> Self {
        Self {
            config: TreeConfig::default(),
            seed: None,
            title: "Evergreen".to_string(),
            initial_state: TreeState::Chaos,
        }
    }

    /// Replace the whole tree config.
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the cone height in world units.
    pub fn with_height(mut self, height: f32) -> Self {
        self.config = self.config.with_height(height);
        self
    }

    /// Set the cone's base radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.config = self.config.with_radius(radius);
        self
    }

    /// Set the radius of the dispersed cloud.
    pub fn with_chaos_radius(mut self, chaos_radius: f32) -> Self {
        self.config = self.config.with_chaos_radius(chaos_radius);
        self
    }

    /// Set the number of needle points.
    ///
    /// The needle buffer must fit in one GPU buffer (48 bytes per needle);
    /// [`run`](Self::run) fails with [`GpuError::BufferTooLarge`](crate::GpuError::BufferTooLarge)
    /// otherwise.
    pub fn with_foliage_count(mut self, count: u32) -> Self {
        self.config = self.config.with_foliage_count(count);
        self
    }

    /// Set the total number of ornaments across all kinds.
    pub fn with_ornament_count(mut self, count: u32) -> Self {
        self.config = self.config.with_ornament_count(count);
        self
    }

    /// Set the share of the remaining distance covered each frame.
    pub fn with_smoothing_rate(mut self, rate: f32) -> Self {
        self.config = self.config.with_smoothing_rate(rate);
        self
    }

    /// Fix the RNG seed so every run builds the same tree.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Window title prefix. State and FPS are appended while running.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// State requested on the first frame. Progress still starts at 0.
    pub fn with_initial_state(mut self, state: TreeState) -> Self {
        self.initial_state = state;
        self
    }

    /// Tree parameters as configured so far.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Build the buffers, open the window and block until it closes.
    pub fn run(self) -> Result<(), SceneError> {
        let started = Instant::now();
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let particles = FoliageBuffers::generate(&self.config, &mut rng).to_gpu();
        let mut state = SceneState::generate(self.config, &mut rng);
        state.set_state(self.initial_state);
        log::info!("Scene generated in {:.2?}", started.elapsed());

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.title, state, particles);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// How the loop reacts to a frame the surface could not deliver.
#[derive(Debug)]
enum FrameFailure {
    Reconfigure,
    Skip(wgpu::SurfaceError),
    Fatal(SceneError),
}

impl From<wgpu::SurfaceError> for FrameFailure {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => FrameFailure::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => FrameFailure::Fatal(SceneError::Surface(e)),
            other => FrameFailure::Skip(other),
        }
    }
}

struct App {
    title: String,
    state: SceneState,
    /// Uploaded on the first `resumed`, then dropped.
    particles: Vec<FoliageParticle>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    input: Input,
    clock: FrameClock,
    #[cfg(feature = "egui")]
    egui: Option<EguiOverlay>,
    /// First fatal error; the loop exits and `run` returns it.
    error: Option<SceneError>,
}

impl App {
    fn new(title: String, state: SceneState, particles: Vec<FoliageParticle>) -> Self {
        Self {
            title,
            state,
            particles,
            window: None,
            gpu: None,
            input: Input::new(),
            clock: FrameClock::new(),
            #[cfg(feature = "egui")]
            egui: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SceneError) {
        log::error!("{err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SceneError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let camera = Camera::new(self.state.config().height);
        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            &self.particles,
            self.state.ornaments(),
            camera,
        ))?;
        self.particles = Vec::new();

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiOverlay::new(gpu.device(), gpu.format(), &window));
        }

        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (time, dt) = self.clock.tick();

        for action in self.input.actions() {
            match action {
                Action::ToggleState => {
                    self.state.toggle();
                }
                Action::TogglePause => self.clock.toggle_pause(),
                Action::Exit => event_loop.exit(),
            }
        }

        #[cfg(feature = "egui")]
        if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            let tree_state = self.state.tree_state();
            let progress = self.state.progress();
            let fps = self.clock.fps();
            let mut toggled = false;
            egui.run(window, |ctx| {
                toggled = overlay_ui(ctx, tree_state, progress, fps);
            });
            if toggled {
                self.state.toggle();
            }
        }

        let progress = self.state.step(time);

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        gpu.camera.orbit(self.input.drag_delta());
        gpu.camera.zoom(self.input.scroll_delta());
        if self.state.tree_state() == TreeState::Formed {
            gpu.camera.auto_rotate(dt);
        }

        let frame = FrameData {
            progress,
            time,
            ornaments: self.state.frame(),
            accents: self.state.accents(),
        };

        #[cfg(feature = "egui")]
        let overlay = self.egui.as_mut().map(|e| e as &mut dyn OverlayPass);
        #[cfg(not(feature = "egui"))]
        let overlay: Option<&mut dyn OverlayPass> = None;

        if let Err(e) = gpu.render(&frame, overlay) {
            match FrameFailure::from(e) {
                FrameFailure::Reconfigure => gpu.reconfigure(),
                FrameFailure::Skip(e) => log::warn!("Dropped frame: {e:?}"),
                FrameFailure::Fatal(err) => self.fail(event_loop, err),
            }
        }

        if let Some(window) = &self.window {
            if self.clock.frame() % 30 == 0 {
                window.set_title(&format!(
                    "{} | {} | {:.0} fps",
                    self.title,
                    self.state.tree_state().label(),
                    self.clock.fps()
                ));
            }
            window.request_redraw();
        }

        self.input.begin_frame();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            let consumed = egui.on_window_event(window, &event);
            let passthrough = matches!(
                event,
                WindowEvent::CloseRequested | WindowEvent::Resized(_) | WindowEvent::RedrawRequested
            );
            if consumed && !passthrough {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => self.input.handle_event(&other),
        }
    }
}

/// Status panel with the toggle button. Returns true when the button was clicked.
#[cfg(feature = "egui")]
fn overlay_ui(ctx: &egui::Context, state: TreeState, progress: f32, fps: f32) -> bool {
    let mut clicked = false;
    egui::Window::new("Evergreen")
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(state.label()).strong());
            ui.add(egui::ProgressBar::new(progress).show_percentage());
            let text = match state {
                TreeState::Chaos => "Assemble",
                TreeState::Formed => "Disperse",
            };
            clicked = ui.button(text).clicked();
            ui.weak(format!("{fps:.0} fps"));
        });
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ornaments: u32) -> SceneState {
        let mut rng = SmallRng::seed_from_u64(17);
        SceneState::generate(TreeConfig::default().with_ornament_count(ornaments), &mut rng)
    }

    #[test]
    fn test_surface_out_of_memory_is_fatal() {
        match FrameFailure::from(wgpu::SurfaceError::OutOfMemory) {
            FrameFailure::Fatal(SceneError::Surface(e)) => assert_eq!(e, wgpu::SurfaceError::OutOfMemory),
            other => panic!("expected a fatal surface error, got {other:?}"),
        }
    }

    #[test]
    fn test_transient_surface_errors_recover() {
        assert!(matches!(FrameFailure::from(wgpu::SurfaceError::Lost), FrameFailure::Reconfigure));
        assert!(matches!(FrameFailure::from(wgpu::SurfaceError::Outdated), FrameFailure::Reconfigure));
        assert!(matches!(FrameFailure::from(wgpu::SurfaceError::Timeout), FrameFailure::Skip(_)));
    }

    #[test]
    fn test_starts_dispersed() {
        let s = state(50);
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.tree_state(), TreeState::Chaos);
        assert_eq!(s.accents(), &Accents::default());
        for item in s.ornaments().items() {
            let inst = s.frame().layer(item.kind)[item.slot as usize];
            assert_eq!(inst.translation(), item.chaos_position);
        }
    }

    #[test]
    fn test_step_feeds_one_progress_everywhere() {
        let mut s = state(80);
        s.toggle();
        let mut progress = 0.0;
        for i in 0..50 {
            progress = s.step(i as f32 / 60.0);
        }
        assert!(progress > 0.0 && progress < 1.0);

        let gift = s
            .ornaments()
            .items()
            .iter()
            .find(|i| i.kind == crate::ornament::OrnamentKind::Gift);
        if let Some(gift) = gift {
            let inst = s.frame().layer(gift.kind)[gift.slot as usize];
            assert!((inst.translation() - gift.position_at(progress)).length() < 1e-4);
        }
        let trunk = s.accents().trunk.map(|t| t.translation().y);
        assert_eq!(trunk, Some(s.config().height * progress * 0.5));
    }

    #[test]
    fn test_builder_forwards_config() {
        let scene = Scene::new()
            .with_foliage_count(10)
            .with_ornament_count(3)
            .with_height(8.0)
            .with_smoothing_rate(0.5);
        assert_eq!(scene.config().foliage_count, 10);
        assert_eq!(scene.config().ornament_count, 3);
        assert_eq!(scene.config().height, 8.0);
        assert_eq!(scene.config().smoothing_rate, 0.5);
    }
}

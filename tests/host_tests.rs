use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use globe_viewer::{
    BasicFramePipeline, FrameContext, FramePipeline, FrameScheduler, FrameStatistics, Globe,
    HostHandle, InputEvent, InvalidArgument, Layer, LayerList, RenderHost, Viewpoint,
    ViewpointController, Viewport,
};

// ============================================================================
// Mock collaborators
// ============================================================================

/// Counts outbound frame requests from the host
struct CountingScheduler {
    requests: AtomicUsize,
}

impl CountingScheduler {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: AtomicUsize::new(0),
        })
    }

    fn count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

fn host_with_scheduler() -> (RenderHost, Arc<CountingScheduler>) {
    let scheduler = CountingScheduler::new();
    (RenderHost::new(scheduler.clone()), scheduler)
}

/// What a pipeline saw in the frame context during one draw call
#[derive(Clone, Debug)]
struct Snapshot {
    equatorial_radius: f64,
    vertical_exaggeration: f64,
    viewport: Viewport,
    layer_count: usize,
    view_state_stamped: bool,
}

/// Pipeline that records the context it is handed, and can be told to flag
/// a follow-up frame on every draw
struct ProbePipeline {
    stats: FrameStatistics,
    last_draw: Rc<RefCell<Option<Snapshot>>>,
    request_render: bool,
}

impl ProbePipeline {
    fn new(request_render: bool) -> (Self, Rc<RefCell<Option<Snapshot>>>) {
        let last_draw = Rc::new(RefCell::new(None));
        (
            Self {
                stats: FrameStatistics::new(),
                last_draw: last_draw.clone(),
                request_render,
            },
            last_draw,
        )
    }
}

impl FramePipeline for ProbePipeline {
    fn draw_frame(&mut self, context: &mut FrameContext) {
        self.stats.begin_frame();
        *self.last_draw.borrow_mut() = Some(Snapshot {
            equatorial_radius: context.globe().equatorial_radius(),
            vertical_exaggeration: context.vertical_exaggeration(),
            viewport: context.viewport(),
            layer_count: context.layers().len(),
            view_state_stamped: context.modelview_projection() != glam::Mat4::IDENTITY,
        });
        if self.request_render {
            context.request_render();
        }
        self.stats.end_frame();
    }

    fn frame_statistics(&self) -> &FrameStatistics {
        &self.stats
    }
}

/// Controller that mirrors its attachment state into a shared cell so tests
/// can observe it after ownership moves into a host
struct ProbeController {
    attachment: Rc<Cell<Option<u64>>>,
    host: Option<HostHandle>,
}

impl ProbeController {
    fn new() -> (Self, Rc<Cell<Option<u64>>>) {
        let attachment = Rc::new(Cell::new(None));
        (
            Self {
                attachment: attachment.clone(),
                host: None,
            },
            attachment,
        )
    }
}

impl ViewpointController for ProbeController {
    fn attach(&mut self, host: HostHandle) -> Result<(), InvalidArgument> {
        if self.host.is_some() {
            return Err(InvalidArgument::new("host", "already attached"));
        }
        self.attachment.set(Some(host.host_id()));
        self.host = Some(host);
        Ok(())
    }

    fn detach(&mut self) -> Option<HostHandle> {
        self.attachment.set(None);
        self.host.take()
    }

    fn attached_host(&self) -> Option<&HostHandle> {
        self.host.as_ref()
    }

    fn on_event(&mut self, _event: InputEvent, _viewpoint: &mut dyn Viewpoint) {}
}

struct NoopLayer;

impl Layer for NoopLayer {
    fn render(&self, _context: &mut FrameContext) {}
}

// ============================================================================
// Mutator validation
// ============================================================================

#[test]
fn test_vertical_exaggeration_accepts_positive_values() {
    let (mut host, _) = host_with_scheduler();
    for v in [0.5, 1.0, 2.5, 1000.0] {
        host.set_vertical_exaggeration(v).unwrap();
        assert_eq!(host.vertical_exaggeration(), v);
    }
}

#[test]
fn test_vertical_exaggeration_rejects_out_of_domain_values() {
    let (mut host, _) = host_with_scheduler();
    host.set_vertical_exaggeration(2.0).unwrap();

    for v in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = host.set_vertical_exaggeration(v).unwrap_err();
        assert_eq!(err.argument, "vertical_exaggeration");
        // Prior state survives the failed call
        assert_eq!(host.vertical_exaggeration(), 2.0);
    }
}

#[test]
fn test_mutators_do_not_schedule_frames() {
    let (mut host, scheduler) = host_with_scheduler();
    host.set_globe(Arc::new(Globe::wgs84()));
    host.set_layers(Arc::new(LayerList::new()));
    host.set_vertical_exaggeration(3.0).unwrap();
    host.on_surface_resized(1024, 768);
    assert_eq!(scheduler.count(), 0);
}

// ============================================================================
// Controller swap protocol
// ============================================================================

#[test]
fn test_controller_swap_detaches_old_and_attaches_new() {
    let (mut host, _) = host_with_scheduler();

    let (controller_a, state_a) = ProbeController::new();
    host.set_viewpoint_controller(Box::new(controller_a)).unwrap();
    assert_eq!(state_a.get(), Some(host.id()));

    let (controller_b, state_b) = ProbeController::new();
    host.set_viewpoint_controller(Box::new(controller_b)).unwrap();

    assert_eq!(state_a.get(), None);
    assert_eq!(state_b.get(), Some(host.id()));
    let attached = host.viewpoint_controller().attached_host().unwrap();
    assert_eq!(attached.host_id(), host.id());
}

#[test]
fn test_controller_attached_elsewhere_is_rejected_without_mutation() {
    let (mut host, _) = host_with_scheduler();
    let (current, current_state) = ProbeController::new();
    host.set_viewpoint_controller(Box::new(current)).unwrap();

    // A controller already bound to some other host
    let foreign_scheduler: Arc<dyn FrameScheduler> = CountingScheduler::new();
    let (mut foreign, foreign_state) = ProbeController::new();
    foreign.attach(HostHandle::new(9999, &foreign_scheduler)).unwrap();

    let err = host.set_viewpoint_controller(Box::new(foreign)).unwrap_err();
    assert_eq!(err.argument, "controller");

    // Neither controller changed hands
    assert_eq!(current_state.get(), Some(host.id()));
    assert_eq!(foreign_state.get(), Some(9999));
}

#[test]
fn test_default_controller_is_attached_to_its_host() {
    let (host, _) = host_with_scheduler();
    let attached = host.viewpoint_controller().attached_host().unwrap();
    assert_eq!(attached.host_id(), host.id());
}

// ============================================================================
// Frame cycle
// ============================================================================

#[test]
fn test_frame_cycle_presents_state_as_of_cycle_start() {
    let (mut host, _) = host_with_scheduler();

    let mut layers = LayerList::new();
    layers.add(Box::new(NoopLayer));
    host.set_layers(Arc::new(layers));
    host.set_vertical_exaggeration(2.5).unwrap();
    host.on_surface_resized(800, 600);

    let (pipeline, seen) = ProbePipeline::new(false);
    host.set_frame_pipeline(Box::new(pipeline));
    host.on_frame();

    let snapshot = seen.borrow().clone().unwrap();
    assert_eq!(snapshot.equatorial_radius, 6_378_137.0);
    assert_eq!(snapshot.vertical_exaggeration, 2.5);
    assert_eq!(snapshot.viewport, Viewport::new(800, 600));
    assert_eq!(snapshot.layer_count, 1);
    // The viewpoint stamped its state before the pipeline ran
    assert!(snapshot.view_state_stamped);
}

#[test]
fn test_mutation_after_a_cycle_does_not_alter_what_it_saw() {
    let (mut host, _) = host_with_scheduler();
    host.set_vertical_exaggeration(2.0).unwrap();

    let (pipeline, seen) = ProbePipeline::new(false);
    host.set_frame_pipeline(Box::new(pipeline));
    host.on_frame();
    host.set_vertical_exaggeration(9.0).unwrap();

    let snapshot = seen.borrow().clone().unwrap();
    assert_eq!(snapshot.vertical_exaggeration, 2.0);
}

#[test]
fn test_next_cycle_picks_up_new_values() {
    let (mut host, _) = host_with_scheduler();
    let (pipeline, seen) = ProbePipeline::new(false);
    host.set_frame_pipeline(Box::new(pipeline));

    host.set_vertical_exaggeration(2.0).unwrap();
    host.on_frame();
    host.set_vertical_exaggeration(4.0).unwrap();
    host.on_frame();

    let snapshot = seen.borrow().clone().unwrap();
    assert_eq!(snapshot.vertical_exaggeration, 4.0);
}

// ============================================================================
// Render-request propagation
// ============================================================================

#[test]
fn test_render_request_forwards_exactly_once_per_cycle() {
    let (mut host, scheduler) = host_with_scheduler();
    let (pipeline, _) = ProbePipeline::new(true);
    host.set_frame_pipeline(Box::new(pipeline));

    host.on_frame();
    assert_eq!(scheduler.count(), 1);
    host.on_frame();
    assert_eq!(scheduler.count(), 2);
}

#[test]
fn test_no_render_request_means_no_outbound_call() {
    let (mut host, scheduler) = host_with_scheduler();
    let (pipeline, _) = ProbePipeline::new(false);
    host.set_frame_pipeline(Box::new(pipeline));

    host.on_frame();
    host.on_frame();
    assert_eq!(scheduler.count(), 0);
}

#[test]
fn test_render_request_does_not_leak_into_the_next_cycle() {
    let (mut host, scheduler) = host_with_scheduler();

    // First pipeline flags a follow-up, its replacement does not
    let (requesting, _) = ProbePipeline::new(true);
    host.set_frame_pipeline(Box::new(requesting));
    host.on_frame();
    assert_eq!(scheduler.count(), 1);

    let (quiet, _) = ProbePipeline::new(false);
    host.set_frame_pipeline(Box::new(quiet));
    host.on_frame();
    assert_eq!(scheduler.count(), 1);
}

// ============================================================================
// Surface lifecycle
// ============================================================================

#[test]
fn test_resize_updates_viewport_seen_by_next_frame() {
    let (mut host, _) = host_with_scheduler();
    let (pipeline, seen) = ProbePipeline::new(false);
    host.set_frame_pipeline(Box::new(pipeline));

    host.on_surface_resized(800, 600);
    assert_eq!(host.viewport(), Viewport::new(800, 600));

    host.on_frame();
    let snapshot = seen.borrow().clone().unwrap();
    assert_eq!(snapshot.viewport, Viewport::new(800, 600));
    assert_eq!(snapshot.viewport.x, 0);
    assert_eq!(snapshot.viewport.y, 0);
}

#[test]
fn test_surface_recreation_resets_state_idempotently() {
    let (mut host, _) = host_with_scheduler();
    host.on_surface_created();
    let first = host.surface_state().clone();
    // Context loss: the platform recreates the surface
    host.on_surface_created();
    assert_eq!(*host.surface_state(), first);
}

// ============================================================================
// Statistics passthrough
// ============================================================================

#[test]
fn test_statistics_follow_the_attached_pipeline() {
    let (mut host, _) = host_with_scheduler();
    host.on_frame();
    host.on_frame();
    assert_eq!(host.frame_statistics().frame_count(), 2);

    // Swapping pipelines swaps the visible accumulator
    host.set_frame_pipeline(Box::new(BasicFramePipeline::new()));
    assert_eq!(host.frame_statistics().frame_count(), 0);

    host.on_frame();
    assert_eq!(host.frame_statistics().frame_count(), 1);
}

// ============================================================================
// Input routing
// ============================================================================

#[test]
fn test_input_reaches_viewpoint_and_requests_a_frame() {
    let (mut host, scheduler) = host_with_scheduler();
    let heading_before = host.viewpoint().heading();

    host.on_input(InputEvent::Rotate { degrees: 15.0 });

    assert_eq!(host.viewpoint().heading(), heading_before + 15.0);
    assert_eq!(scheduler.count(), 1);
}

#[test]
fn test_zoom_input_lowers_the_eye() {
    let (mut host, _) = host_with_scheduler();
    let altitude_before = host.viewpoint().altitude();
    host.on_input(InputEvent::Zoom { amount: 1.0 });
    assert!(host.viewpoint().altitude() < altitude_before);
}

//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use scriblio_core::board::BoardId;
use scriblio_core::camera::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use scriblio_core::canvas::Canvas;
use scriblio_core::input::{InputState, Modifiers, MouseButton, PointerEvent};
use scriblio_core::minimap::MiniMap;
use scriblio_core::shapes::{Shape, TEXT_PLACEHOLDER};
use scriblio_core::tools::ToolKind;
use scriblio_render::{RenderContext, Renderer, TextEditState, VelloRenderer};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{CursorIcon, Window, WindowId};

use crate::event_handler::{EventHandler, HoverTarget};
use crate::ui::{render_ui, UiAction, UiState};

/// Base URL used for share links when there is no browser location.
#[cfg(not(target_arch = "wasm32"))]
const SHARE_BASE_URL: &str = "https://scriblio.app";

/// Offset applied to pasted shapes so copies don't sit on the originals.
const PASTE_OFFSET: f64 = 16.0;

#[cfg(feature = "native")]
mod clipboard {
    /// Copy the share link to the system clipboard.
    pub fn write_text(text: &str) {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(text.to_string()) {
                    log::error!("Failed to copy link to clipboard: {}", e);
                } else {
                    log::info!("Share link copied to clipboard");
                }
            }
            Err(e) => log::error!("Failed to access clipboard: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod clipboard {
    /// Copy the share link via the async browser clipboard.
    pub fn write_text(text: &str) {
        crate::web::write_clipboard(text.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    /// Surface created asynchronously on WASM, picked up on the next event.
    static PENDING_SURFACE: std::cell::RefCell<
        Option<(vello::util::RenderContext, RenderSurface<'static>)>,
    > = const { std::cell::RefCell::new(None) };
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Scriblio".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::WHITE,
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    canvas: Canvas,
    input: InputState,
    config: AppConfig,
    minimap: MiniMap,
    board_id: Option<BoardId>,

    // Event handling
    event_handler: EventHandler,

    // Text editing state (when editing a text shape)
    text_edit: Option<TextEditState>,
    /// First keystroke replaces the placeholder content.
    placeholder_armed: bool,

    /// Clipboard for copied/cut shapes (JSON serialized).
    clipboard_shapes: Option<String>,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after the surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm (compute shader requirement); the
        // surface format may be Bgra8Unorm, so blit between the two.
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut canvas = Canvas::new();
        canvas.set_viewport_size(surface.config.width as f64, surface.config.height as f64);

        let mut ui_state = UiState::default();
        let mut board_id = None;

        // Route: the landing view creates a board on demand; a board URL
        // opens the canvas directly. Native has no routing and goes straight
        // to a fresh board.
        #[cfg(target_arch = "wasm32")]
        {
            match crate::web::current_route() {
                crate::web::Route::Landing => ui_state.landing = true,
                crate::web::Route::Board(id) => board_id = Some(id),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            board_id = Some(BoardId::generate());
        }
        ui_state.board_id = board_id.clone();

        let mut minimap = MiniMap::new();
        minimap.attach(&canvas.document, &canvas.camera, canvas.viewport_size);

        log::info!(
            "Scriblio initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        for shortcut in crate::shortcuts::ShortcutRegistry::all() {
            log::debug!("{:20} {}", shortcut.format(), shortcut.description);
        }

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            canvas,
            input: InputState::new(),
            config: self.config.clone(),
            minimap,
            board_id,
            event_handler: EventHandler::new(),
            text_edit: None,
            placeholder_armed: false,
            clipboard_shapes: None,
        });

        self.pending_window = None;
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach the canvas to the DOM and fill the viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let web_window = web_sys::window().expect("No window");
            let document = web_window.document().expect("No document");

            let viewport_width = web_window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.width as f64);
            let viewport_height = web_window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.height as f64);

            let canvas = document
                .get_element_by_id("scriblio-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let body = document.body()?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("scriblio-canvas");
                    body.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                })
                .expect("Failed to create canvas");

            let dpr = web_window.device_pixel_ratio();
            canvas.set_width((viewport_width * dpr) as u32);
            canvas.set_height((viewport_height * dpr) as u32);
            let style = canvas.style();
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("display", "block");
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("top", "0");
            let _ = style.set_property("left", "0");

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);
            let size = window.inner_size();
            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                size.width.max(1),
                size.height.max(1),
                PresentMode::AutoVsync,
            ))
            .expect("Failed to create surface");

            // Transmute lifetime to 'static - safe because App owns everything
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface);
        }

        #[cfg(target_arch = "wasm32")]
        {
            // Surface creation is async on WebGPU; stash the result and pick
            // it up on the next event.
            let window_for_init = window.clone();
            self.pending_window = Some(window);
            wasm_bindgen_futures::spawn_local(async move {
                let mut render_cx = vello::util::RenderContext::new();
                let size = window_for_init.inner_size();
                match render_cx
                    .create_surface(
                        window_for_init.clone(),
                        size.width.max(1),
                        size.height.max(1),
                        PresentMode::AutoVsync,
                    )
                    .await
                {
                    Ok(surface) => {
                        // Transmute lifetime to 'static - safe because App owns everything
                        let surface: RenderSurface<'static> =
                            unsafe { std::mem::transmute(surface) };
                        PENDING_SURFACE.with(|cell| {
                            *cell.borrow_mut() = Some((render_cx, surface));
                        });
                        window_for_init.request_redraw();
                    }
                    Err(e) => log::error!("Failed to create surface: {}", e),
                }
            });
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Pick up the asynchronously created surface (WASM)
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            let pending = PENDING_SURFACE.with(|cell| cell.borrow_mut().take());
            if let Some((render_cx, surface)) = pending {
                if let Some(window) = self.pending_window.take() {
                    self.render_cx = Some(render_cx);
                    self.finish_init(window, surface);
                }
            }
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };

        // Give egui first refusal on input events
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_consumed = egui_response.consumed;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(render_cx) = self.render_cx.as_mut() {
                        render_cx.resize_surface(&mut state.surface, size.width, size.height);
                    }
                    state
                        .canvas
                        .set_viewport_size(size.width as f64, size.height as f64);
                    state.window.request_redraw();
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let mods = modifiers.state();
                state.input.set_modifiers(Modifiers {
                    shift: mods.shift_key(),
                    ctrl: mods.control_key(),
                    alt: mods.alt_key(),
                    meta: mods.super_key(),
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = Point::new(position.x, position.y);
                state
                    .input
                    .handle_pointer_event(PointerEvent::Move { position: point });

                if !egui_consumed && !state.ui_state.landing {
                    let world = state.canvas.camera.screen_to_world(point);
                    state
                        .event_handler
                        .handle_move(&mut state.canvas, world, point, &state.input);
                    update_cursor(state, world);
                }
                state.window.request_redraw();
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let Some(mouse_button) = map_button(button) else {
                    return;
                };
                let point = state.input.pointer_position;

                match btn_state {
                    ElementState::Pressed => {
                        state.input.handle_pointer_event(PointerEvent::Down {
                            position: point,
                            button: mouse_button,
                        });

                        if !egui_consumed
                            && !state.ui_state.landing
                            && mouse_button == MouseButton::Left
                        {
                            let world = state.canvas.camera.screen_to_world(point);
                            let new_edit = state.event_handler.handle_press(
                                &mut state.canvas,
                                world,
                                point,
                                &state.input,
                            );
                            sync_editor_lifecycle(state, new_edit);
                        }
                    }
                    ElementState::Released => {
                        state.input.handle_pointer_event(PointerEvent::Up {
                            position: point,
                            button: mouse_button,
                        });

                        if !state.ui_state.landing && mouse_button == MouseButton::Left {
                            let world = state.canvas.camera.screen_to_world(point);
                            state.event_handler.handle_release(
                                &mut state.canvas,
                                world,
                                &state.input,
                            );
                        }
                    }
                }
                state.window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !egui_consumed
                    && !state.ui_state.landing
                {
                    handle_keyboard(state, &event);
                }
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            _ => {}
        }
    }
}

impl App {
    /// Render one frame: egui chrome, ui actions, mini-map sync, vello scene.
    fn redraw(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };

        // Mirror canvas state into the chrome
        state.ui_state.current_tool = state.canvas.tool_manager.current_tool;
        state.ui_state.selection_count = state.canvas.selection.len();
        state.ui_state.can_undo = state.canvas.document.can_undo();
        state.ui_state.can_redo = state.canvas.document.can_redo();
        state.ui_state.board_id = state.board_id.clone();

        // Run egui
        let raw_input = state.egui_state.take_egui_input(&state.window);
        let mut ui_action = None;
        let egui_output = state.egui_ctx.run(raw_input, |ctx| {
            ui_action = render_ui(ctx, &mut state.ui_state);
        });
        state
            .egui_state
            .handle_platform_output(&state.window, egui_output.platform_output);
        let egui_primitives = state
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        if let Some(action) = ui_action {
            apply_ui_action(state, action);
        }

        // Drain document mutations into the mini-map, in emission order
        let events = state.canvas.document.take_events();
        state.minimap.process_events(
            &events,
            &state.canvas.document,
            &state.canvas.camera,
            state.canvas.viewport_size,
        );

        // Build the Vello scene
        let viewport_size = Size::new(
            state.canvas.viewport_size.width,
            state.canvas.viewport_size.height,
        );
        let mut render_ctx = RenderContext::new(&state.canvas, viewport_size)
            .with_scale_factor(state.window.scale_factor())
            .with_background(state.config.background_color)
            .with_editing_shape(state.event_handler.editing_text);
        if !state.ui_state.landing {
            render_ctx = render_ctx.with_minimap(&state.minimap);
        }

        state.shape_renderer.build_scene(&render_ctx);

        // The edited text renders separately, with its caret
        if let Some(text_id) = state.event_handler.editing_text {
            if let Some(Shape::Text(text)) = state.canvas.document.get_shape(text_id) {
                if let Some(edit_state) = &state.text_edit {
                    let camera_transform = state.canvas.camera.transform();
                    state
                        .shape_renderer
                        .render_text_editing(text, edit_state, camera_transform);
                }
            }
        }

        let scene: Scene = state.shape_renderer.take_scene();

        // Render
        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let params = RenderParams {
            base_color: state.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello requires StorageBinding, which WebGPU only supports for
        // Rgba8Unorm, so render to an intermediate texture and blit.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        // Blit the RGBA intermediate texture to the surface texture
        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            state.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        // Update egui textures
        for (id, image_delta) in &egui_output.textures_delta.set {
            state
                .egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        // Render egui on top
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });

            state.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // forget_lifetime satisfies egui-wgpu's 'static requirement
            let mut render_pass = render_pass.forget_lifetime();
            state
                .egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            state.egui_renderer.free_texture(id);
        }

        surface_texture.present();
        state.input.begin_frame();
        state.window.request_redraw();
    }
}

/// Map a winit mouse button to the core button type.
fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Update the window cursor for the current tool and hover target.
fn update_cursor(state: &mut AppState, world: Point) {
    let icon = match state.canvas.tool_manager.current_tool {
        ToolKind::Select => {
            if state.event_handler.is_panning() {
                CursorIcon::Grabbing
            } else {
                match state.event_handler.hover_target(&state.canvas, world) {
                    HoverTarget::Handle => CursorIcon::NwseResize,
                    HoverTarget::Shape => CursorIcon::Move,
                    HoverTarget::None => CursorIcon::Default,
                }
            }
        }
        ToolKind::Text => CursorIcon::Text,
        _ => CursorIcon::Crosshair,
    };
    state.window.set_cursor(icon);
}

/// Keep the app-side text editor in sync with the handler's editing state.
fn sync_editor_lifecycle(state: &mut AppState, new_edit: Option<scriblio_core::shapes::ShapeId>) {
    if let Some(id) = new_edit {
        if let Some(Shape::Text(text)) = state.canvas.document.get_shape(id) {
            state.placeholder_armed = text.content == TEXT_PLACEHOLDER;
            state.text_edit = Some(TextEditState::new(&text.content));
        }
    } else if state.event_handler.editing_text.is_none() {
        state.text_edit = None;
        state.placeholder_armed = false;
    }
}

/// Write the editor content into the edited shape.
fn sync_editor_to_shape(state: &mut AppState) {
    let Some(id) = state.event_handler.editing_text else {
        return;
    };
    let Some(editor) = &state.text_edit else {
        return;
    };
    if let Some(Shape::Text(text)) = state.canvas.document.get_shape_mut(id) {
        if text.content != editor.text() {
            text.content = editor.text().to_string();
            text.invalidate_cache();
            state.canvas.document.notify_modified(id);
        }
    }
}

/// Commit the text being edited and leave edit mode.
fn commit_text_edit(state: &mut AppState) {
    if let Some(editor) = state.text_edit.take() {
        let content = editor.text().to_string();
        state
            .event_handler
            .exit_text_edit(&mut state.canvas, Some(&content));
    }
    state.placeholder_armed = false;
}

/// Apply a chrome action to the canvas.
fn apply_ui_action(state: &mut AppState, action: UiAction) {
    match action {
        UiAction::SetTool(tool) => {
            if state.event_handler.is_editing_text() {
                commit_text_edit(state);
            }
            state.canvas.set_tool(tool);
        }
        UiAction::SetColor(color) => {
            state.ui_state.active_color = color;
            let [r, g, b, a] = color.to_array();
            state
                .canvas
                .tool_manager
                .current_style
                .set_stroke(Color::from_rgba8(r, g, b, a));
        }
        UiAction::DeleteSelected => {
            state.canvas.delete_selected();
        }
        UiAction::ClearAll => {
            if state.event_handler.is_editing_text() {
                commit_text_edit(state);
                state.event_handler.editing_text = None;
            }
            state.canvas.clear_all();
        }
        UiAction::ZoomIn => {
            let center = viewport_center(state);
            state.canvas.camera.zoom_at(center, ZOOM_IN_FACTOR);
        }
        UiAction::ZoomOut => {
            let center = viewport_center(state);
            state.canvas.camera.zoom_at(center, ZOOM_OUT_FACTOR);
        }
        UiAction::Undo => {
            state.canvas.clear_selection();
            state.canvas.document.undo();
        }
        UiAction::Redo => {
            state.canvas.clear_selection();
            state.canvas.document.redo();
        }
        UiAction::ShareBoard => {
            share_board(state);
        }
        UiAction::NewBoard => {
            let id = BoardId::generate();
            log::info!("Created board {}", id);
            #[cfg(target_arch = "wasm32")]
            crate::web::navigate_to_board(&id);
            state.board_id = Some(id);
            state.ui_state.landing = false;
        }
    }
}

/// The visual center of the viewport (zoom anchor).
fn viewport_center(state: &AppState) -> Point {
    Point::new(
        state.canvas.viewport_size.width / 2.0,
        state.canvas.viewport_size.height / 2.0,
    )
}

/// Copy the board link to the clipboard and confirm with a toast.
fn share_board(state: &mut AppState) {
    #[cfg(target_arch = "wasm32")]
    let url = crate::web::current_url().unwrap_or_else(|| {
        state
            .board_id
            .as_ref()
            .map(|id| id.path())
            .unwrap_or_else(|| "/".to_string())
    });

    #[cfg(not(target_arch = "wasm32"))]
    let url = match state.board_id.as_ref() {
        Some(id) => format!("{}{}", SHARE_BASE_URL, id.path()),
        None => SHARE_BASE_URL.to_string(),
    };

    #[cfg(any(target_arch = "wasm32", feature = "native"))]
    clipboard::write_text(&url);
    #[cfg(not(any(target_arch = "wasm32", feature = "native")))]
    log::info!("Share link: {}", url);

    state.ui_state.show_toast("Link copied!");
}

/// Handle a key press outside of egui.
fn handle_keyboard(state: &mut AppState, event: &winit::event::KeyEvent) {
    // Text editing captures the keyboard
    if state.event_handler.is_editing_text() {
        handle_text_editing_key(state, event);
        return;
    }

    let ctrl = state.input.ctrl();
    let shift = state.input.shift();

    match &event.logical_key {
        Key::Named(NamedKey::Delete) | Key::Named(NamedKey::Backspace) => {
            state.canvas.delete_selected();
        }
        Key::Named(NamedKey::Escape) => {
            state.event_handler.cancel(&mut state.canvas);
        }
        Key::Character(ch) => {
            let ch = ch.to_lowercase();
            match (ctrl, shift, ch.as_str()) {
                (true, false, "z") => {
                    state.canvas.clear_selection();
                    state.canvas.document.undo();
                }
                (true, true, "z") | (true, false, "y") => {
                    state.canvas.clear_selection();
                    state.canvas.document.redo();
                }
                (true, false, "a") => state.canvas.select_all(),
                (true, false, "c") => copy_selection(state),
                (true, false, "x") => {
                    copy_selection(state);
                    state.canvas.delete_selected();
                }
                (true, false, "v") => paste_clipboard(state),
                (false, _, "v") => state.canvas.set_tool(ToolKind::Select),
                (false, _, "p") => state.canvas.set_tool(ToolKind::Draw),
                (false, _, "r") => state.canvas.set_tool(ToolKind::Rectangle),
                (false, _, "c") => state.canvas.set_tool(ToolKind::Circle),
                (false, _, "t") => state.canvas.set_tool(ToolKind::Text),
                _ => {}
            }
        }
        _ => {}
    }
}

/// Route a key press into the inline text editor.
fn handle_text_editing_key(state: &mut AppState, event: &winit::event::KeyEvent) {
    let Some(editor) = state.text_edit.as_mut() else {
        return;
    };

    match &event.logical_key {
        Key::Named(NamedKey::Escape) => {
            commit_text_edit(state);
            return;
        }
        Key::Named(NamedKey::Enter) => editor.newline(),
        Key::Named(NamedKey::Backspace) => {
            if state.placeholder_armed {
                editor.clear();
                state.placeholder_armed = false;
            } else {
                editor.backspace();
            }
        }
        Key::Named(NamedKey::Delete) => editor.delete(),
        Key::Named(NamedKey::ArrowLeft) => {
            editor.move_left();
            state.placeholder_armed = false;
        }
        Key::Named(NamedKey::ArrowRight) => {
            editor.move_right();
            state.placeholder_armed = false;
        }
        Key::Named(NamedKey::Home) => editor.move_home(),
        Key::Named(NamedKey::End) => editor.move_end(),
        Key::Named(NamedKey::Space) => {
            if state.placeholder_armed {
                editor.clear();
                state.placeholder_armed = false;
            }
            editor.insert_char(' ');
        }
        Key::Character(text) => {
            if state.placeholder_armed {
                editor.clear();
                state.placeholder_armed = false;
            }
            for ch in text.chars() {
                editor.insert_char(ch);
            }
        }
        _ => {}
    }

    sync_editor_to_shape(state);
}

/// Serialize the selection to the shape clipboard.
fn copy_selection(state: &mut AppState) {
    let shapes: Vec<Shape> = state
        .canvas
        .selection
        .iter()
        .filter_map(|&id| state.canvas.document.get_shape(id).cloned())
        .collect();
    if shapes.is_empty() {
        return;
    }
    match serde_json::to_string(&shapes) {
        Ok(json) => state.clipboard_shapes = Some(json),
        Err(e) => log::error!("Failed to serialize shapes: {}", e),
    }
}

/// Paste previously copied shapes with fresh ids and a small offset.
fn paste_clipboard(state: &mut AppState) {
    let Some(json) = state.clipboard_shapes.as_ref() else {
        return;
    };
    let shapes: Vec<Shape> = match serde_json::from_str(json) {
        Ok(shapes) => shapes,
        Err(e) => {
            log::error!("Failed to parse clipboard shapes: {}", e);
            return;
        }
    };
    if shapes.is_empty() {
        return;
    }

    state.canvas.document.push_undo();
    state.canvas.clear_selection();
    let offset = kurbo::Affine::translate((PASTE_OFFSET, PASTE_OFFSET));
    for mut shape in shapes {
        shape.regenerate_id();
        shape.transform(offset);
        let id = shape.id();
        state.canvas.document.add_shape(shape);
        state.canvas.add_to_selection(id);
    }
}

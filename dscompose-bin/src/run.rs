use dscompose::{
    CoreConfig, Session, Console, RawInput, RetroButton, TouchPoint, AvInfo
};

use log::info;
use winit::{
    application::ApplicationHandler, dpi::{
        LogicalSize, Size, PhysicalSize
    }, event::{
        ElementState, WindowEvent, MouseButton
    }, event_loop::{
        EventLoop
    }, window::Window, keyboard::{PhysicalKey, KeyCode}
};

const FRAME_TIME: chrono::Duration = chrono::Duration::nanoseconds(1_000_000_000 / 60);

/// Stands in for the emulator: reports what it is told.
#[derive(Default)]
struct LogConsole {
    key_mask:   u32,
    lid_closed: bool,
}

impl Console for LogConsole {
    fn set_key_mask(&mut self, mask: u32) {
        if mask != self.key_mask {
            info!("keys: {:03X}", mask);
        }
        self.key_mask = mask;
    }

    fn is_lid_closed(&self) -> bool {
        self.lid_closed
    }

    fn set_lid_closed(&mut self, closed: bool) {
        self.lid_closed = closed;
    }

    fn touch_screen(&mut self, point: TouchPoint) {
        info!("touch: {}, {}", point.x, point.y);
    }

    fn release_screen(&mut self) {
        info!("release");
    }

    fn set_mic_active(&mut self, active: bool) {
        info!("mic: {}", active);
    }
}

struct WindowState {
    window:         std::sync::Arc<Window>,
    surface:        wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
}

impl WindowState {
    fn resize_surface(&mut self, size: PhysicalSize<u32>, device: &wgpu::Device) {
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(device, &self.surface_config);
    }
}

/// Texture holding the composited frame, sized to the current layout.
struct ScreenTexture {
    extent:     wgpu::Extent3d,
    texture:    wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl ScreenTexture {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, sampler: &wgpu::Sampler, av_info: &AvInfo) -> Self {
        let extent = wgpu::Extent3d {
            width: av_info.base_width as u32,
            height: av_info.base_height as u32,
            depth_or_array_layers: 1
        };

        // XRGB8888 is stored little-endian, so bytes are in BGRA order.
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: None,
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[wgpu::TextureFormat::Bgra8UnormSrgb]
        });
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view)
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler)
                }
            ],
            label: None
        });

        Self {
            extent, texture, bind_group
        }
    }
}

struct App {
    window:  Option<WindowState>,
    session: Session,
    console: LogConsole,
    input:   RawInput,

    top_screen:    Vec<u32>,
    bottom_screen: Vec<u32>,

    // WGPU params
    instance:          wgpu::Instance,
    adapter:           wgpu::Adapter,
    device:            wgpu::Device,
    queue:             wgpu::Queue,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler:           wgpu::Sampler,
    screen_texture:    ScreenTexture,
    render_pipeline:   wgpu::RenderPipeline,

    last_frame_time: chrono::DateTime<chrono::Utc>,
}

impl App {
    fn new(mut session: Session, top_screen: Vec<u32>, bottom_screen: Vec<u32>) -> Self {
        // Setup wgpu
        let instance = wgpu::Instance::new(&Default::default());

        let adapter = futures::executor::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: None,
        })).expect("Failed to find appropriate adapter");

        let (device, queue) = futures::executor::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            ..Default::default()
        })).expect("Failed to create device");

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None
                },
            ]
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[]
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter:     wgpu::FilterMode::Nearest,
            min_filter:     wgpu::FilterMode::Linear,
            mipmap_filter:  wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let av_info = session.take_geometry_update().unwrap_or_else(|| session.layout().av_info());
        let screen_texture = ScreenTexture::new(&device, &bind_group_layout, &sampler, &av_info);

        let shader_module = device.create_shader_module(wgpu::include_wgsl!("./shaders/shader.wgsl"));

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default()
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                .. Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default()
            }),
            multiview: None,
            cache: None
        });

        Self {
            window: None,
            session,
            console: LogConsole::default(),
            input: RawInput::default(),

            top_screen,
            bottom_screen,

            instance,
            adapter,
            device,
            queue,
            bind_group_layout,
            sampler,
            screen_texture,
            render_pipeline,

            last_frame_time: chrono::Utc::now(),
        }
    }

    /// Run the compositor for one frame and present it.
    fn frame(&mut self) {
        self.session.run_input(&self.input, &mut self.console);
        self.session.render(&self.top_screen, &self.bottom_screen);

        if let Some(av_info) = self.session.take_geometry_update() {
            info!("new geometry: {}x{}", av_info.base_width, av_info.base_height);
            self.screen_texture = ScreenTexture::new(&self.device, &self.bind_group_layout, &self.sampler, &av_info);
            let window = &self.window.as_ref().unwrap().window;
            let _ = window.request_inner_size(window_size(&av_info));
        }

        let frame_view = self.session.framebuffer().expect("viewer only supports software compositing");
        self.queue.write_texture(
            self.screen_texture.texture.as_image_copy(),
            frame_view.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(frame_view.pitch as u32),
                rows_per_image: None,
            },
            self.screen_texture.extent
        );

        let frame = self.window.as_ref().unwrap().surface.get_current_texture().expect("Timeout when acquiring next swapchain tex.");
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {label: None});

        {
            let view = frame.texture.create_view(&Default::default());
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                    resolve_target: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            rpass.set_pipeline(&self.render_pipeline);
            rpass.set_bind_group(0, &self.screen_texture.bind_group, &[]);
            rpass.draw(0..4, 0..1);
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
    }

    fn set_button(&mut self, button: RetroButton, pressed: bool) {
        self.input.set_button(button, pressed);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_inner_size(window_size(&self.session.layout().av_info()))
            .with_title("dscompose");
        let window = std::sync::Arc::new(event_loop.create_window(window_attrs).unwrap());

        let surface = self.instance.create_surface(window.clone()).expect("Failed to create surface");

        let size = window.inner_size();
        let surface_config = surface.get_default_config(&self.adapter, size.width, size.height).expect("Could not get default surface config");
        surface.configure(&self.device, &surface_config);

        self.window = Some(WindowState {
            window, surface, surface_config
        });

        self.last_frame_time = chrono::Utc::now();
    }

    fn window_event(
            &mut self,
            event_loop: &winit::event_loop::ActiveEventLoop,
            _window_id: winit::window::WindowId,
            event: WindowEvent,
        ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            },
            WindowEvent::Resized(size) => {
                self.window.as_mut().unwrap().resize_surface(size, &self.device);
            },
            WindowEvent::RedrawRequested => {
                let now = chrono::Utc::now();
                if now.signed_duration_since(self.last_frame_time) >= FRAME_TIME {
                    self.last_frame_time = now;
                    self.frame();
                }
                self.window.as_ref().unwrap().window.request_redraw();
            },
            WindowEvent::KeyboardInput { device_id: _, event, is_synthetic: _ } => {
                let pressed = match event.state {
                    ElementState::Pressed => true,
                    ElementState::Released => false,
                };
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::KeyX)        => self.set_button(RetroButton::A, pressed),
                    PhysicalKey::Code(KeyCode::KeyZ)        => self.set_button(RetroButton::B, pressed),
                    PhysicalKey::Code(KeyCode::KeyD)        => self.set_button(RetroButton::X, pressed),
                    PhysicalKey::Code(KeyCode::KeyC)        => self.set_button(RetroButton::Y, pressed),
                    PhysicalKey::Code(KeyCode::KeyA)        => self.set_button(RetroButton::L, pressed),
                    PhysicalKey::Code(KeyCode::KeyS)        => self.set_button(RetroButton::R, pressed),
                    PhysicalKey::Code(KeyCode::Space)       => self.set_button(RetroButton::Select, pressed),
                    PhysicalKey::Code(KeyCode::Enter)       => self.set_button(RetroButton::Start, pressed),
                    PhysicalKey::Code(KeyCode::ArrowUp)     => self.set_button(RetroButton::Up, pressed),
                    PhysicalKey::Code(KeyCode::ArrowDown)   => self.set_button(RetroButton::Down, pressed),
                    PhysicalKey::Code(KeyCode::ArrowLeft)   => self.set_button(RetroButton::Left, pressed),
                    PhysicalKey::Code(KeyCode::ArrowRight)  => self.set_button(RetroButton::Right, pressed),
                    PhysicalKey::Code(KeyCode::KeyQ)        => self.set_button(RetroButton::L2, pressed),
                    PhysicalKey::Code(KeyCode::KeyW)        => self.set_button(RetroButton::R2, pressed),
                    PhysicalKey::Code(KeyCode::KeyE)        => self.set_button(RetroButton::L3, pressed),
                    PhysicalKey::Code(KeyCode::KeyR)        => self.set_button(RetroButton::R3, pressed),
                    // Right stick
                    PhysicalKey::Code(KeyCode::KeyJ)        => self.input.right_analog.0 = if pressed {-i16::MAX} else {0},
                    PhysicalKey::Code(KeyCode::KeyL)        => self.input.right_analog.0 = if pressed {i16::MAX} else {0},
                    PhysicalKey::Code(KeyCode::KeyI)        => self.input.right_analog.1 = if pressed {-i16::MAX} else {0},
                    PhysicalKey::Code(KeyCode::KeyK)        => self.input.right_analog.1 = if pressed {i16::MAX} else {0},
                    _ => {},
                }
            },
            WindowEvent::CursorMoved {
                position: winit::dpi::PhysicalPosition {x, y},
                ..
            } => {
                let size = self.window.as_ref().unwrap().window.inner_size();
                self.input.pointer.x = to_pointer_coord(x, size.width);
                self.input.pointer.y = to_pointer_coord(y, size.height);
            },
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.input.pointer.pressed = state == ElementState::Pressed;
            },
            _ => {}
        }
    }
}

/// Window size for a frame: double the buffer size.
fn window_size(av_info: &AvInfo) -> Size {
    Size::Logical(LogicalSize{width: (av_info.base_width * 2) as f64, height: (av_info.base_height * 2) as f64})
}

/// Convert a window position into the frontend pointer range.
fn to_pointer_coord(position: f64, size: u32) -> i16 {
    let normalised = position / (size.max(1) as f64);
    ((normalised * 65536.0) - 32768.0).clamp(-32767.0, 32767.0) as i16
}

pub fn run(config: CoreConfig, top_screen: Vec<u32>, bottom_screen: Vec<u32>) {
    let session = Session::new(config).unwrap_or_else(|e| panic!("invalid options: {}", e));

    let event_loop = EventLoop::new().expect("Failed to create event loop");

    let mut app = App::new(session, top_screen, bottom_screen);
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);
    event_loop.run_app(&mut app).unwrap();
}

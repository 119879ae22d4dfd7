// main.rs — 入口：窗口 + 一个查看器控制器 + 事件循环

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // 在 Release 模式下隐藏控制台窗口

mod camera;
mod config;
mod error;
mod i18n;
mod model;
mod preset;
mod renderer;
mod scene;
mod session;
mod surface;
mod ui;
mod viewer;

use config::ViewerConfig;
use error::ViewerError;
use renderer::WindowSurfaces;
use surface::ContainerSize;
use viewer::ViewerController;

use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::resolve();
    i18n::init(&config.lang);

    let event_loop = EventLoop::new();
    let window = match WindowBuilder::new()
        .with_title(i18n::tr("app.title"))
        .with_inner_size(LogicalSize::new(1280, 720))
        .build(&event_loop)
    {
        Ok(window) => Arc::new(window),
        Err(e) => {
            log::error!("failed to create window: {e}");
            std::process::exit(1);
        }
    };

    let mut viewer = ViewerController::new(
        WindowSurfaces::new(window.clone()),
        &config,
        model::resolve_model_path(),
    );
    if let Err(e) = viewer.mount(ContainerSize::of_window(&window)) {
        log::error!("{e}");
        std::process::exit(1);
    }

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                // 先让 egui / 相机控制器处理
                if viewer.handle_window_event(&event) {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        viewer.unmount();
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                        viewer.resize(ContainerSize::of_window(&window));
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => match viewer.frame() {
                Ok(()) => {}
                Err(ViewerError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("out of GPU memory, exiting");
                    viewer.unmount();
                    *control_flow = ControlFlow::Exit;
                }
                // 重新挂载失败后已无会话，和启动失败一样退出
                Err(e @ ViewerError::Remount(_)) => {
                    log::error!("{e}");
                    *control_flow = ControlFlow::ExitWithCode(1);
                }
                Err(e) => log::warn!("render error: {e}"),
            },

            // 渲染循环：仅在挂载期间请求下一帧
            Event::MainEventsCleared => {
                if viewer.is_mounted() {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    });
}

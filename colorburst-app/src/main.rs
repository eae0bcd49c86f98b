use anyhow::{Context, Result};
use colorburst_confetti::ConfettiEngine;
use colorburst_core::{ConfettiPage, PageEvent, Settings};
use colorburst_ui::{create_window, to_slint_image, ColorThief, ImageLoader, MainWindow, SlintPage};
use slint::{ComponentHandle, Timer, TimerMode};
use std::rc::Rc;
use std::time::Duration;

type App = ConfettiPage<SlintPage, ColorThief, ConfettiEngine>;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    log::info!("colorburst starting...");

    let mut settings = Settings::from_env()?;
    // Optional image source on the command line wins over the settings file
    if let Some(src) = std::env::args().nth(1) {
        settings.initial_image = Some(src);
    }

    let ui = create_window()?;
    let loader = ImageLoader::new(tokio::runtime::Handle::current(), &settings.loader)?;
    let size = ui.window().size();
    let engine = ConfettiEngine::new(size.width.max(1), size.height.max(1));

    let page = ConfettiPage::wire(SlintPage::new(&ui, loader), ColorThief, engine.clone(), &settings)
        .context("Failed to set up the page")?;
    let page = Rc::new(page);
    log::info!("Page wired.");

    let page_click = page.clone();
    ui.on_confetti_clicked(move || dispatch(&page_click, PageEvent::ButtonClick));

    let page_input = page.clone();
    ui.on_url_input(move || dispatch(&page_input, PageEvent::UrlInput));

    let page_load = page.clone();
    ui.on_image_loaded(move || dispatch(&page_load, PageEvent::ImageLoad));

    if let Some(src) = &settings.initial_image {
        ui.set_image_url(src.as_str().into());
        dispatch(&page, PageEvent::UrlInput);
    }

    let frame_timer = Timer::default();
    let ui_frame = ui.as_weak();
    let mut was_busy = false;
    frame_timer.start(TimerMode::Repeated, FRAME_INTERVAL, move || {
        if let Some(ui) = ui_frame.upgrade() {
            was_busy = draw_frame(&ui, &engine, was_busy);
        }
    });

    ui.run()?;

    Ok(())
}

fn dispatch(page: &App, event: PageEvent) {
    if let Err(e) = page.dispatch(event) {
        log::error!("{:?} handler failed: {:#}", event, e);
    }
}

fn draw_frame(ui: &MainWindow, engine: &ConfettiEngine, was_busy: bool) -> bool {
    let size = ui.window().size();
    engine.set_viewport(size.width.max(1), size.height.max(1));

    if !engine.is_busy() {
        if was_busy {
            ui.set_confetti_layer(slint::Image::default());
        }
        return false;
    }

    let live = engine.tick();
    ui.set_confetti_layer(to_slint_image(&engine.frame()));
    live
}

mod run;
mod screens;

use clap::Parser;

use dscompose::{
    CoreConfig, ScreenLayout, CursorMode, TouchMode, HybridSmallScreen, Screen
};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "View DS screen layouts and touch input.")]
struct Args {
    /// Raw XRGB8888 dump of the top screen.
    #[clap(long)]
    top: Option<PathBuf>,

    /// Raw XRGB8888 dump of the bottom screen.
    #[clap(long)]
    bottom: Option<PathBuf>,

    /// Screen layout. Repeat to cycle through several.
    #[clap(short, long = "layout")]
    layouts: Vec<ScreenLayout>,

    /// Switch the top and bottom screens.
    #[clap(short, long)]
    swap: bool,

    /// Gap between stacked screens, in pixels.
    #[clap(short, long, default_value = "0")]
    gap: usize,

    /// Magnification of the large screen in hybrid layouts.
    #[clap(long, default_value = "2")]
    hybrid_ratio: usize,

    /// Small screens in hybrid layouts [one, both].
    #[clap(long, default_value = "both")]
    hybrid_small_screen: HybridSmallScreen,

    /// When to show the cursor [disabled, touching, timeout, always].
    #[clap(long, default_value = "timeout")]
    cursor: CursorMode,

    #[clap(long, default_value = "2")]
    cursor_size: u32,

    /// Idle frames before hiding the cursor. 0 never hides it.
    #[clap(long, default_value = "180")]
    cursor_timeout: u32,

    /// Touch input device [disabled, pointer, joystick, auto].
    #[clap(short, long, default_value = "auto")]
    touch: TouchMode,

    /// Joystick cursor speed.
    #[clap(long, default_value = "1.0")]
    sensitivity: f32,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = CoreConfig {
        layouts: if args.layouts.is_empty() {
            vec![ScreenLayout::TopBottom]
        } else {
            args.layouts
        },
        swap_screens: args.swap,
        screen_gap: args.gap,
        hybrid_ratio: args.hybrid_ratio,
        hybrid_small_screen: args.hybrid_small_screen,
        cursor_mode: args.cursor,
        cursor_size: args.cursor_size,
        cursor_timeout: args.cursor_timeout,
        touch_mode: args.touch,
        joystick_sensitivity: args.sensitivity,
        ..CoreConfig::default()
    };

    let top = args.top.map(|p| screens::load_screen(&p)).unwrap_or_else(|| screens::test_pattern(Screen::Top));
    let bottom = args.bottom.map(|p| screens::load_screen(&p)).unwrap_or_else(|| screens::test_pattern(Screen::Bottom));

    run::run(config, top, bottom);
}

// pulp-textview entry point
//
// Boot: hardware -> SD probe -> open README.TXT (or the built-in help
// text from flash when the card or the file is missing) -> poll loop.
// Poll loop: read the button ladders every POLL_MS, turn presses into
// scroll steps, feed the scroll position to the stream session and log
// what the window did.
//
// The panel is not driven here; the session's geometry is reported
// over the log so it can be checked against a host-side renderer.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use log::{debug, info, warn};
use static_cell::StaticCell;

use pulp_textview::board::{Board, Button, DISPLAY_HEIGHT, DISPLAY_WIDTH, InputHw, SdSpi, ViewAction};
use pulp_textview::drivers::flash::FlashFiles;
use pulp_textview::drivers::sdcard::SdStorage;
use pulp_textview::fonts;
use pulp_textview::stream::{FileAccess, Measure, SLOT_COUNT, StreamConfig, StreamSession};

esp_bootloader_esp_idf::esp_app_desc!();

const DEMO_PATH: &str = "README.TXT";
const HELP_PATH: &str = "HELP.TXT";

static BUILTIN: &[(&str, &[u8])] = &[(HELP_PATH, include_bytes!("../../assets/help.txt"))];

const POLL_MS: u32 = 10;
const REPEAT_POLLS: u32 = 15; // 150 ms between repeats while held
const SCROLL_LINES: i32 = 6;
const MARGIN_X: u32 = 16;
const FONT_IDX: u8 = 0;

const VIEWPORT_HEIGHT: i32 = DISPLAY_HEIGHT as i32;

static SD: StaticCell<SdStorage<SdSpi>> = StaticCell::new();

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("booting...");

    let Board {
        mut input,
        sd_spi,
        epd_cs: _epd_cs,
    } = Board::init(peripherals);
    let delay = Delay::new();

    let measure = fonts::body_measure(FONT_IDX, DISPLAY_WIDTH as u32 - 2 * MARGIN_X);
    info!(
        "text area {}px wide, {} columns, {}px lines",
        DISPLAY_WIDTH as u32 - 2 * MARGIN_X,
        measure.columns(),
        measure.line_height()
    );

    let sd = SD.init(SdStorage::new(sd_spi));
    if sd.probe() {
        let mut session = StreamSession::new(sd.file_access(), measure, StreamConfig::DEFAULT);
        match session.open_stream(DEMO_PATH) {
            Ok(()) => view(&mut session, DEMO_PATH, &mut input, &delay),
            Err(e) => warn!("{}: {}, using built-in text", DEMO_PATH, e),
        }
    }

    let mut session = StreamSession::new(FlashFiles::new(BUILTIN), measure, StreamConfig::DEFAULT);
    if let Err(e) = session.open_stream(HELP_PATH) {
        warn!("{}: {}", HELP_PATH, e);
    }
    view(&mut session, HELP_PATH, &mut input, &delay)
}

fn view<F: FileAccess, M: Measure>(
    session: &mut StreamSession<F, M>,
    path: &str,
    input: &mut InputHw,
    delay: &Delay,
) -> ! {
    let step = session.measure().line_height().max(1) * SCROLL_LINES;
    let mut scroll = 0;
    let mut held: Option<Button> = None;
    let mut held_polls = 0u32;

    report(session, path);

    loop {
        delay.delay_millis(POLL_MS);

        let now = input.read_button();
        let fire = match (now, held) {
            (Some(b), Some(h)) if b == h => {
                held_polls += 1;
                b.repeats() && held_polls % REPEAT_POLLS == 0
            }
            (Some(_), _) => {
                held_polls = 0;
                true
            }
            (None, _) => false,
        };
        held = now;

        let Some(button) = now.filter(|_| fire) else {
            continue;
        };
        debug!("button: {}", button);

        match button.action() {
            ViewAction::ScrollDown => scroll += step,
            ViewAction::ScrollUp => scroll -= step,
            ViewAction::Reopen => {
                scroll = 0;
                match session.open_stream(path) {
                    Ok(()) => report(session, path),
                    Err(e) => warn!("reopen {}: {}", path, e),
                }
                continue;
            }
            ViewAction::Close => {
                session.close_stream();
                scroll = 0;
                continue;
            }
        }

        if !session.is_active() {
            continue;
        }

        // a scroll container bounds the offset to its content
        let max_scroll = (session.content_height() - VIEWPORT_HEIGHT).max(0);
        scroll = scroll.clamp(0, max_scroll);

        let update = session.on_scroll(scroll, VIEWPORT_HEIGHT);
        scroll = update.scroll_y;

        if update.failed_loads > 0 {
            warn!("{} chunk load(s) failed", update.failed_loads);
        }
        if update.reloaded() {
            info!(
                "slid {} down, {} up; scroll now {}",
                update.shifted_down, update.shifted_up, update.scroll_y
            );
            report(session, path);
        } else {
            debug!("scroll {}", scroll);
        }
    }
}

fn report<F: FileAccess, M: Measure>(session: &StreamSession<F, M>, path: &str) {
    if !session.is_active() {
        info!("{}: closed", path);
        return;
    }

    let (base, total) = session.current_window();
    let bytes = session.window_bytes();
    info!(
        "{}: chunks {}..{} of {}, bytes {}..{} of {}",
        path,
        base,
        (base + SLOT_COUNT).min(total),
        total,
        bytes.start,
        bytes.end,
        session.file_size()
    );
    info!(
        "  top {} | slots {:?} {:?} | bottom {} | content {}",
        session.top_space(),
        session.slot_height(0),
        session.slot_height(1),
        session.bottom_space(),
        session.content_height()
    );

    let first = session
        .slot_text(0)
        .ok()
        .and_then(|t| t.lines().next())
        .unwrap_or("");
    info!("  > {}", first);
}

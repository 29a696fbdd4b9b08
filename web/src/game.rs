use crate::sound::WebAudio;
use crate::utils::*;
use bitflags::bitflags;
use clap::Args;
use fireworks_core as game;
use game::{CellDisplay, Coord, Coord2, Difficulty, Status, TimerState};
use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use yew::prelude::*;

/// Holding a cell this long flags it instead of revealing it.
const LONG_PRESS_MS: u32 = 500;

/// Faster than a second so the counter flips close to the real second boundary.
const TICK_MS: u32 = 250;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub(crate) struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

/// Only touch and pen presses flag on hold, a mouse has a right button for that.
fn arms_long_press(pointer_type: &str) -> bool {
    pointer_type != "mouse"
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    /// Position, buttons held, and whether holding may turn into a flag.
    Press(Coord2, MouseButtons, bool),
    Release(Coord2),
    Cancel,
    Flag(Coord2),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    LongPress(Coord2),
    Tick(game::SessionId),
    NewGame,
    SetDifficulty(Difficulty),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: Coord,
    col: Coord,
    display: CellDisplay,
    #[prop_or_default]
    triggered: bool,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use CellDisplay::*;

    let CellProps {
        row,
        col,
        display,
        triggered,
        pressed,
        callback,
    } = props.clone();
    let pos = (row, col);

    let (mut class, content) = match display {
        Hidden => (classes!(), html! {}),
        Revealed(0) => (classes!("revealed"), html! {}),
        Revealed(count) => (
            classes!("revealed", format!("num-{}", count)),
            html! { {count.to_string()} },
        ),
        Mine => (classes!("revealed", "mine", "fireworks"), html! { "🎆" }),
        Flagged => (classes!("flagged"), html! { "🎁" }),
    };
    class.push("cell");
    if triggered {
        class.push("oops");
    }
    if pressed {
        class.push("pressed");
    }

    let onpointerdown = {
        let callback = callback.clone();
        Callback::from(move |e: PointerEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            let long_press = arms_long_press(&e.pointer_type());
            callback.emit(CellMsg::Press(pos, buttons, long_press));
            log::trace!("{:?} {} down ({:?})", pos, e.pointer_type(), buttons);
        })
    };

    let onpointerup = {
        let callback = callback.clone();
        Callback::from(move |_: PointerEvent| {
            callback.emit(CellMsg::Release(pos));
            log::trace!("{:?} pointer up", pos);
        })
    };

    let onpointerleave = {
        let callback = callback.clone();
        Callback::from(move |_: PointerEvent| callback.emit(CellMsg::Cancel))
    };

    let onpointercancel = {
        let callback = callback.clone();
        Callback::from(move |_: PointerEvent| callback.emit(CellMsg::Cancel))
    };

    let oncontextmenu = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        callback.emit(CellMsg::Flag(pos));
    });

    html! {
        <td {class} {onpointerdown} {onpointerup} {onpointerleave} {onpointercancel} {oncontextmenu}>
            {content}
        </td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board to start with: beginner, intermediate or expert
    #[arg(short, long, default_value_t = Difficulty::Beginner)]
    difficulty: Difficulty,
}

/// A primary-button press that has not been released yet.
struct PendingPress {
    pos: Coord2,
    long_pressed: bool,
    _timeout: Option<Timeout>,
}

pub(crate) struct GameView {
    engine: game::BoardEngine,
    audio: WebAudio,
    press: Option<PendingPress>,
    ticker: Option<(game::SessionId, Interval)>,
    fixed_seed: Option<u64>,
    _keydown: EventListener,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        self.fixed_seed.unwrap_or_else(js_random_seed)
    }

    fn current_difficulty(&self) -> Difficulty {
        self.engine.difficulty().unwrap_or_default()
    }

    /// Plays end-of-game feedback and keeps the ticker in step with the engine clock.
    fn apply(&mut self, ctx: &Context<Self>, changes: game::ChangeSet) -> bool {
        if let Some(status) = changes.status_change() {
            log::debug!("status: {:?}", status);
        }
        game::dispatch_feedback(&mut self.audio, &changes);
        self.sync_ticker(ctx);
        changes.has_update()
    }

    fn sync_ticker(&mut self, ctx: &Context<Self>) {
        let session = self.engine.session_id();
        match self.engine.timer_state() {
            TimerState::Running => {
                if !matches!(&self.ticker, Some((ticking, _)) if *ticking == session) {
                    let link = ctx.link().clone();
                    let interval = Interval::new(TICK_MS, move || {
                        link.send_message(Msg::Tick(session))
                    });
                    self.ticker = Some((session, interval));
                }
            }
            TimerState::Idle | TimerState::Stopped => {
                // dropping the interval cancels it
                self.ticker = None;
            }
        }
    }

    fn reset(&mut self, ctx: &Context<Self>, difficulty: Difficulty) {
        let seed = self.next_seed();
        self.engine.reset(difficulty, seed);
        self.press = None;
        self.sync_ticker(ctx);
    }

    fn is_pressed(&self, pos: Coord2, display: CellDisplay) -> bool {
        matches!(
            (&self.press, display),
            (Some(PendingPress { pos: pressed, long_pressed: false, .. }), CellDisplay::Hidden)
                if *pressed == pos
        )
    }

    fn on_cell_event(&mut self, ctx: &Context<Self>, msg: CellMsg) -> bool {
        use CellMsg::*;

        match msg {
            Press(pos, buttons, long_press) => {
                if buttons != MouseButtons::LEFT || self.engine.is_over() {
                    return false;
                }
                let timeout = long_press.then(|| {
                    let link = ctx.link().clone();
                    Timeout::new(LONG_PRESS_MS, move || {
                        link.send_message(Msg::LongPress(pos))
                    })
                });
                self.press = Some(PendingPress {
                    pos,
                    long_pressed: false,
                    _timeout: timeout,
                });
                true
            }
            Release(pos) => match self.press.take() {
                Some(PendingPress {
                    pos: pressed,
                    long_pressed: false,
                    ..
                }) if pressed == pos => {
                    log::debug!("reveal cell: {:?}", pos);
                    let changes = self.engine.reveal(pos);
                    self.apply(ctx, changes);
                    true
                }
                Some(_) => true,
                None => false,
            },
            Cancel => self.press.take().is_some(),
            Flag(pos) => {
                // touch browsers fire contextmenu after a long press that already flagged
                if matches!(&self.press, Some(press) if press.pos == pos && press.long_pressed) {
                    return false;
                }
                self.press = None;
                log::debug!("flag cell: {:?}", pos);
                let changes = self.engine.toggle_flag(pos);
                self.apply(ctx, changes)
            }
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let GameProps { seed, difficulty } = ctx.props().clone();
        let initial_seed = seed.unwrap_or_else(js_random_seed);

        let keydown = {
            let link = ctx.link().clone();
            EventListener::new(&gloo::utils::document(), "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.code() == "Space" {
                    event.prevent_default();
                    link.send_message(Msg::NewGame);
                }
            })
        };

        Self {
            engine: game::BoardEngine::new(difficulty, initial_seed),
            audio: WebAudio::default(),
            press: None,
            ticker: None,
            fixed_seed: seed,
            _keydown: keydown,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CellEvent(cell_msg) => {
                log::trace!("cell event: {:?}", cell_msg);
                self.on_cell_event(ctx, cell_msg)
            }
            LongPress(pos) => {
                let Some(press) = self.press.as_mut() else {
                    return false;
                };
                if press.pos != pos || press.long_pressed {
                    return false;
                }
                press.long_pressed = true;
                press._timeout = None;
                log::debug!("long press flag: {:?}", pos);
                let changes = self.engine.toggle_flag(pos);
                self.apply(ctx, changes);
                true
            }
            Tick(session) => self.engine.tick(session),
            NewGame => {
                self.reset(ctx, self.current_difficulty());
                true
            }
            SetDifficulty(difficulty) => {
                self.reset(ctx, difficulty);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (rows, cols) = self.engine.size();
        let status = self.engine.status();
        let current = self.engine.difficulty();

        let face = match status {
            Status::Idle | Status::InProgress => "😊",
            Status::Won => "😎",
            Status::Lost => "😵",
        };
        let message = match status {
            Status::Won => "You won!",
            Status::Lost => "Game over!",
            Status::Idle | Status::InProgress => "",
        };
        let mines_left = format_for_counter(self.engine.remaining_mines());
        let elapsed_time = format_for_counter(self.engine.elapsed_secs() as isize);

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });

        html! {
            <div class="fireworks" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <menu>
                    {
                        for Difficulty::ALL.into_iter().map(|difficulty| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::SetDifficulty(difficulty));
                            let class = classes!((current == Some(difficulty)).then_some("selected"));
                            html! { <button {class} {onclick}>{difficulty.key()}</button> }
                        })
                    }
                </menu>
                <nav>
                    <aside>{mines_left}</aside>
                    <span><button class="face" onclick={cb_new_game}>{face}</button></span>
                    <aside>{elapsed_time}</aside>
                </nav>
                <table class={classes!(status.is_over().then_some("over"))}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let pos = (row, col);
                                        let display = self.engine.cell_display(pos).unwrap_or_default();
                                        let triggered = self.engine.triggered_mine() == Some(pos);
                                        let pressed = self.is_pressed(pos, display);
                                        let callback = ctx.link().callback(Msg::CellEvent);
                                        html! {
                                            <CellView {row} {col} {display} {triggered} {pressed} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <p>{message}</p>
            </div>
        }
    }
}

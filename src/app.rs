use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
    time::Instant,
};
use tracing::{debug, info};

use crate::{
    auth::{AuthError, CredentialVerifier, StaticCredentials},
    config::Config,
    position::{FundManager, InvestmentPosition},
    range::TimeRange,
    series::{RandomSource, SeriesCache, SeriesPoint},
    session::{Identity, Session},
};

/// Verdict sent back from a sign-in worker thread
#[derive(Debug)]
pub struct AuthMessage {
    attempt: u64,
    verdict: Result<Identity, AuthError>,
}

/// Tracks clickable UI regions for mouse interaction
#[derive(Default, Clone, Debug)]
pub struct ClickableRegions {
    pub email_field: Rect,
    pub password_field: Rect,
    pub submit_button: Rect,
    pub sign_out_button: Rect,
    /// Range selector areas on the chart
    pub range_tabs: Vec<(Rect, TimeRange)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub focus: Field,
    pub error: Option<String>,
    /// Attempt number and start time while a verdict is outstanding
    pub pending: Option<(u64, Instant)>,
}

impl SignInForm {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }
}

/// Per-session chart state; dropped on sign-out.
#[derive(Debug)]
pub struct DashboardState {
    pub range: TimeRange,
    /// Index into the visible slice being inspected
    pub cursor: Option<usize>,
    pub series: SeriesCache,
}

impl DashboardState {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            cursor: None,
            series: SeriesCache::new(),
        }
    }

    pub fn visible_len(&self) -> usize {
        self.range.visible_len(self.series.len())
    }

    pub fn visible(&self) -> &[SeriesPoint] {
        self.range.slice(self.series.master())
    }

    pub fn select_range(&mut self, range: TimeRange) {
        if self.range != range {
            debug!(range = range.label(), "range selected");
            self.range = range;
            self.cursor = None;
        }
    }

    fn move_cursor(&mut self, step: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = None;
            return;
        }
        let current = self.cursor.unwrap_or(len - 1) as isize;
        let next = if self.cursor.is_none() {
            current
        } else {
            (current + step).clamp(0, len as isize - 1)
        };
        self.cursor = Some(next as usize);
    }
}

pub enum Action {
    None,
    Quit,
    SubmitSignIn,
    SignOut,
    SelectRange(TimeRange),
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub position: InvestmentPosition,
    pub manager: FundManager,
    pub sign_in: SignInForm,
    pub dashboard: DashboardState,
    pub clickable_regions: ClickableRegions,
    verifier: Arc<dyn CredentialVerifier>,
    random: Box<dyn RandomSource>,
    next_attempt: u64,
    // Sign-in worker channel
    auth_receiver: Receiver<AuthMessage>,
    auth_sender: Sender<AuthMessage>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_parts(
            config,
            Arc::new(StaticCredentials::default()),
            Box::new(rand::thread_rng()),
        )
    }

    pub fn with_parts(
        config: Config,
        verifier: Arc<dyn CredentialVerifier>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let (auth_sender, auth_receiver) = mpsc::channel();
        App {
            dashboard: DashboardState::new(config.default_range),
            config,
            session: Session::new(),
            position: InvestmentPosition::sbi_elss(),
            manager: FundManager::rakesh_gupta(),
            sign_in: SignInForm::default(),
            clickable_regions: ClickableRegions::default(),
            verifier,
            random,
            next_attempt: 0,
            auth_receiver,
            auth_sender,
        }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Makes sure the master series exists for the current value.
    pub fn ensure_series(&mut self, today: NaiveDate) {
        self.dashboard
            .series
            .get_or_generate(self.position.current_value, today, self.random.as_mut());
    }

    /// Start verifying the form's credentials on a background thread.
    /// The verdict arrives through `process_auth_results`.
    pub fn submit_sign_in(&mut self) {
        let form = &mut self.sign_in;
        if form.is_pending() {
            return;
        }
        if form.email.is_empty() {
            form.focus = Field::Email;
            return;
        }
        if form.password.is_empty() {
            form.focus = Field::Password;
            return;
        }

        form.error = None;
        self.next_attempt += 1;
        let attempt = self.next_attempt;
        form.pending = Some((attempt, Instant::now()));

        let sender = self.auth_sender.clone();
        let verifier = Arc::clone(&self.verifier);
        let delay = self.config.sign_in_delay();
        let email = form.email.clone();
        let password = form.password.clone();

        thread::spawn(move || {
            thread::sleep(delay);
            let verdict = verifier.verify(&email, &password);
            // Receiver gone means the app shut down mid-delay
            let _ = sender.send(AuthMessage { attempt, verdict });
        });
    }

    /// Process any pending sign-in verdicts (non-blocking).
    /// Returns true if the screen changed.
    pub fn process_auth_results(&mut self) -> bool {
        let mut updated = false;

        while let Ok(msg) = self.auth_receiver.try_recv() {
            let current = self.sign_in.pending.map(|(attempt, _)| attempt);
            if current != Some(msg.attempt) {
                continue;
            }
            self.sign_in.pending = None;
            match msg.verdict {
                Ok(identity) => {
                    self.session.sign_in(identity);
                    self.sign_in = SignInForm::default();
                }
                Err(err) => {
                    self.sign_in.error = Some(err.to_string());
                }
            }
            updated = true;
        }

        updated
    }

    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.sign_in = SignInForm::default();
        self.dashboard = DashboardState::new(self.config.default_range);
    }

    pub fn select_range(&mut self, range: TimeRange) {
        self.dashboard.select_range(range);
    }
}

pub fn handle_input(app: &mut App, key: KeyCode) -> Action {
    if app.session.is_authenticated() {
        handle_dashboard_input(app, key)
    } else {
        handle_sign_in_input(app, key)
    }
}

fn handle_sign_in_input(app: &mut App, key: KeyCode) -> Action {
    let form = &mut app.sign_in;
    if key == KeyCode::Esc {
        return Action::Quit;
    }
    if form.is_pending() {
        // Form is frozen until the verdict arrives
        return Action::None;
    }

    match key {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.toggle_focus();
            Action::None
        }
        KeyCode::Enter => match form.focus {
            Field::Email => {
                form.focus = Field::Password;
                Action::None
            }
            Field::Password => Action::SubmitSignIn,
        },
        KeyCode::Backspace => {
            form.focused_mut().pop();
            Action::None
        }
        KeyCode::Char(c) => {
            form.focused_mut().push(c);
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_dashboard_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('o') => Action::SignOut,
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            Action::SelectRange(TimeRange::ORDER[idx])
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.dashboard.move_cursor(-1);
            Action::None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.dashboard.move_cursor(1);
            Action::None
        }
        KeyCode::Home => {
            if app.dashboard.visible_len() > 0 {
                app.dashboard.cursor = Some(0);
            }
            Action::None
        }
        KeyCode::End => {
            let len = app.dashboard.visible_len();
            if len > 0 {
                app.dashboard.cursor = Some(len - 1);
            }
            Action::None
        }
        KeyCode::Esc => {
            app.dashboard.cursor = None;
            Action::None
        }
        _ => Action::None,
    }
}

pub fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

pub fn handle_mouse(app: &mut App, kind: MouseEventKind, x: u16, y: u16) -> Action {
    if !matches!(kind, MouseEventKind::Down(MouseButton::Left)) {
        return Action::None;
    }
    let regions = &app.clickable_regions;

    if app.session.is_authenticated() {
        if point_in_rect(x, y, regions.sign_out_button) {
            return Action::SignOut;
        }
        for (rect, range) in &regions.range_tabs {
            if point_in_rect(x, y, *rect) {
                return Action::SelectRange(*range);
            }
        }
        return Action::None;
    }

    if app.sign_in.is_pending() {
        return Action::None;
    }
    if point_in_rect(x, y, regions.submit_button) {
        return Action::SubmitSignIn;
    }
    if point_in_rect(x, y, regions.email_field) {
        app.sign_in.focus = Field::Email;
    } else if point_in_rect(x, y, regions.password_field) {
        app.sign_in.focus = Field::Password;
    }
    Action::None
}

/// Applies an action; returns false when the app should exit.
pub fn apply_action(app: &mut App, action: Action) -> bool {
    match action {
        Action::Quit => {
            info!("quit requested");
            return false;
        }
        Action::SubmitSignIn => app.submit_sign_in(),
        Action::SignOut => app.sign_out(),
        Action::SelectRange(range) => app.select_range(range),
        Action::None => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::WINDOW_DAYS;
    use rand::{rngs::StdRng, SeedableRng};

    fn app() -> App {
        let config = Config {
            sign_in_delay_ms: 0,
            ..Config::default()
        };
        App::with_parts(
            config,
            Arc::new(StaticCredentials::default()),
            Box::new(StdRng::seed_from_u64(3)),
        )
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, KeyCode::Char(c));
        }
    }

    fn signed_in_app() -> App {
        let mut app = app();
        app.session.sign_in(Identity::new("a@b.c", "Ann"));
        app.ensure_series(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        app
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut app = app();
        type_text(&mut app, "me@x.io");
        handle_input(&mut app, KeyCode::Tab);
        type_text(&mut app, "pw!");
        handle_input(&mut app, KeyCode::Backspace);

        assert_eq!(app.sign_in.email, "me@x.io");
        assert_eq!(app.sign_in.password, "pw");
        assert_eq!(app.sign_in.focus, Field::Password);
    }

    #[test]
    fn enter_on_email_moves_to_password() {
        let mut app = app();
        assert!(matches!(handle_input(&mut app, KeyCode::Enter), Action::None));
        assert_eq!(app.sign_in.focus, Field::Password);
        assert!(matches!(handle_input(&mut app, KeyCode::Enter), Action::SubmitSignIn));
    }

    #[test]
    fn empty_fields_do_not_submit() {
        let mut app = app();
        app.sign_in.focus = Field::Password;
        app.submit_sign_in();
        assert!(!app.sign_in.is_pending());
        assert_eq!(app.sign_in.focus, Field::Email);

        app.sign_in.email = "a@b.c".into();
        app.submit_sign_in();
        assert!(!app.sign_in.is_pending());
        assert_eq!(app.sign_in.focus, Field::Password);
    }

    #[test]
    fn pending_form_ignores_edits() {
        let mut app = app();
        app.sign_in.pending = Some((99, Instant::now()));
        type_text(&mut app, "abc");
        assert!(app.sign_in.email.is_empty());
        assert!(matches!(handle_input(&mut app, KeyCode::Esc), Action::Quit));
    }

    #[test]
    fn stale_verdict_is_ignored() {
        let mut app = app();
        app.auth_sender
            .send(AuthMessage {
                attempt: 42,
                verdict: Ok(Identity::new("x", "y")),
            })
            .unwrap();
        assert!(!app.process_auth_results());
        assert!(!app.session.is_authenticated());
    }

    #[test]
    fn number_keys_select_ranges() {
        let mut app = signed_in_app();
        assert!(matches!(
            handle_input(&mut app, KeyCode::Char('1')),
            Action::SelectRange(TimeRange::OneMonth)
        ));
        assert!(matches!(
            handle_input(&mut app, KeyCode::Char('5')),
            Action::SelectRange(TimeRange::All)
        ));
        assert!(matches!(handle_input(&mut app, KeyCode::Char('6')), Action::None));
    }

    #[test]
    fn cursor_starts_at_latest_point_and_clamps() {
        let mut app = signed_in_app();
        app.select_range(TimeRange::OneMonth);

        handle_input(&mut app, KeyCode::Right);
        assert_eq!(app.dashboard.cursor, Some(29));
        handle_input(&mut app, KeyCode::Right);
        assert_eq!(app.dashboard.cursor, Some(29));
        handle_input(&mut app, KeyCode::Left);
        assert_eq!(app.dashboard.cursor, Some(28));
        handle_input(&mut app, KeyCode::Home);
        assert_eq!(app.dashboard.cursor, Some(0));
        handle_input(&mut app, KeyCode::Left);
        assert_eq!(app.dashboard.cursor, Some(0));
        handle_input(&mut app, KeyCode::Esc);
        assert_eq!(app.dashboard.cursor, None);
    }

    #[test]
    fn range_change_resets_cursor() {
        let mut app = signed_in_app();
        handle_input(&mut app, KeyCode::End);
        assert_eq!(app.dashboard.cursor, Some(364));
        app.select_range(TimeRange::All);
        assert_eq!(app.dashboard.cursor, None);
        assert_eq!(app.dashboard.visible_len(), WINDOW_DAYS);
    }

    #[test]
    fn sign_out_drops_cached_series() {
        let mut app = signed_in_app();
        app.select_range(TimeRange::SixMonths);
        assert!(!app.dashboard.series.is_empty());

        assert!(apply_action(&mut app, Action::SignOut));
        assert!(!app.session.is_authenticated());
        assert!(app.dashboard.series.is_empty());
        assert_eq!(app.dashboard.range, TimeRange::OneYear);
    }

    #[test]
    fn clicks_hit_recorded_regions() {
        let mut app = signed_in_app();
        app.clickable_regions.range_tabs = vec![(Rect::new(10, 5, 4, 1), TimeRange::ThreeMonths)];
        app.clickable_regions.sign_out_button = Rect::new(60, 1, 10, 1);
        let down = MouseEventKind::Down(MouseButton::Left);

        assert!(matches!(
            handle_mouse(&mut app, down, 12, 5),
            Action::SelectRange(TimeRange::ThreeMonths)
        ));
        assert!(matches!(handle_mouse(&mut app, down, 65, 1), Action::SignOut));
        assert!(matches!(handle_mouse(&mut app, down, 0, 0), Action::None));
        assert!(matches!(
            handle_mouse(&mut app, MouseEventKind::Moved, 12, 5),
            Action::None
        ));
    }

    #[test]
    fn clicking_fields_moves_focus() {
        let mut app = app();
        app.clickable_regions.password_field = Rect::new(5, 10, 30, 1);
        app.clickable_regions.submit_button = Rect::new(5, 12, 30, 1);
        let down = MouseEventKind::Down(MouseButton::Left);

        handle_mouse(&mut app, down, 6, 10);
        assert_eq!(app.sign_in.focus, Field::Password);
        assert!(matches!(handle_mouse(&mut app, down, 6, 12), Action::SubmitSignIn));
    }
}

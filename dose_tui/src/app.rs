//! Application state

use dose_core::catalog::{Catalog, PrescriptionOptions};
use dose_core::config::TuningConstants;
use dose_core::dosing::{estimated_ammo, load};
use dose_core::engine::{Engine, RoundResult};
use dose_core::judgment::{
    CaseDescription, Judgment, JudgmentClientConfig, JudgmentProvider, LlmJudgmentProvider,
    OfflineProvider, PendingJudgment,
};
use dose_core::outcome::{synthesize_with, RoundOutcome};
use dose_core::progression::Progression;
use dose_core::translate::translate_case;
use dose_core::types::{Disease, Drug, DrugFamily, Protocol};
use dose_core::vitals::VitalsState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{info, warn};

/// Radians turned per aim key press
const AIM_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    ChapterSelect,
    Prescription,
    Analyzing,
    Playing,
    RoundResult,
    GameOver,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu => "Menu",
            Screen::ChapterSelect => "Select Case",
            Screen::Prescription => "Prescription",
            Screen::Analyzing => "Analyzing",
            Screen::Playing => "Treatment",
            Screen::RoundResult => "Result",
            Screen::GameOver => "Game Over",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    QuickPlay,
    SelectCase,
    Quit,
}

impl MenuItem {
    pub fn all() -> &'static [MenuItem] {
        &[MenuItem::QuickPlay, MenuItem::SelectCase, MenuItem::Quit]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::QuickPlay => "Quick Play (Random)",
            MenuItem::SelectCase => "Select Case",
            MenuItem::Quit => "Quit",
        }
    }
}

/// A row of the chapter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterRow {
    Section(usize),
    /// Index into the catalog's cases
    Case(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxField {
    Family,
    Drug,
    Dose,
    Interval,
    Duration,
}

impl RxField {
    pub fn all() -> &'static [RxField] {
        &[
            RxField::Family,
            RxField::Drug,
            RxField::Dose,
            RxField::Interval,
            RxField::Duration,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            RxField::Family => "Drug Class",
            RxField::Drug => "Agent",
            RxField::Dose => "Dose",
            RxField::Interval => "Interval",
            RxField::Duration => "Duration",
        }
    }

    fn index(&self) -> usize {
        RxField::all().iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> RxField {
        let all = RxField::all();
        all[(self.index() + 1) % all.len()]
    }

    fn prev(&self) -> RxField {
        let all = RxField::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// Prescription being edited; values are indices into the option lists
#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionDraft {
    pub field: RxField,
    pub family: Option<usize>,
    pub drug: Option<usize>,
    pub dose: usize,
    pub interval: usize,
    pub duration: usize,
}

impl PrescriptionDraft {
    /// Starts at 500 mg q12h for 7 days when those options exist
    pub fn new(options: &PrescriptionOptions) -> Self {
        let find = |values: &[f64], wanted: f64| {
            values
                .iter()
                .position(|v| (v - wanted).abs() < 1e-9)
                .unwrap_or(0)
        };
        PrescriptionDraft {
            field: RxField::Family,
            family: None,
            drug: None,
            dose: find(&options.doses, 500.0),
            interval: find(&options.intervals, 12.0),
            duration: options.durations.iter().position(|d| *d == 7).unwrap_or(0),
        }
    }
}

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

fn cycle_optional(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(index) => cycle(index, len, forward),
        None if forward => 0,
        None => len - 1,
    })
}

/// LLM provider when configured, otherwise strict protocol matching only
pub fn provider_from_environment() -> Arc<dyn JudgmentProvider> {
    let provider = JudgmentClientConfig::from_default_sources()
        .and_then(|config| LlmJudgmentProvider::from_config(&config));
    match provider {
        Ok(provider) => {
            info!(model = provider.name(), "judgment service configured");
            Arc::new(provider)
        }
        Err(err) => {
            info!(reason = %err, "no judgment service, using strict protocol matching");
            Arc::new(OfflineProvider)
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub catalog: Catalog,
    pub tuning: TuningConstants,
    pub vitals: VitalsState,
    pub progression: Progression,
    provider: Arc<dyn JudgmentProvider>,
    pub menu_index: usize,
    pub chapter_cursor: usize,
    pub expanded_section: Option<usize>,
    pub draft: PrescriptionDraft,
    pub prescribed: Option<Protocol>,
    pending: Option<PendingJudgment>,
    pub analyzing_time: f64,
    pub judgment: Option<Judgment>,
    pub engine: Option<Engine>,
    pub outcome: Option<RoundOutcome>,
    pub show_reasoning: bool,
    pub should_quit: bool,
    rng: StdRng,
}

impl App {
    pub fn new(
        catalog: Catalog,
        tuning: TuningConstants,
        provider: Arc<dyn JudgmentProvider>,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let progression = Progression::new(StdRng::seed_from_u64(rng.gen()));
        App {
            screen: Screen::Menu,
            vitals: VitalsState::new(tuning.vitals.clone()),
            draft: PrescriptionDraft::new(&catalog.options),
            catalog,
            tuning,
            progression,
            provider,
            menu_index: 0,
            chapter_cursor: 0,
            expanded_section: None,
            prescribed: None,
            pending: None,
            analyzing_time: 0.0,
            judgment: None,
            engine: None,
            outcome: None,
            show_reasoning: false,
            should_quit: false,
            rng,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn current_disease(&self) -> Option<&Disease> {
        self.catalog.diseases.get(self.progression.case_index())
    }

    // ---- Chapter list ----

    pub fn chapter_rows(&self) -> Vec<ChapterRow> {
        let mut rows = Vec::new();
        for (section_index, section) in self.catalog.sections.iter().enumerate() {
            rows.push(ChapterRow::Section(section_index));
            if self.expanded_section != Some(section_index) {
                continue;
            }
            for chapter in &section.chapters {
                for (case_index, disease) in self.catalog.diseases.iter().enumerate() {
                    if disease.chapter_id == chapter.id {
                        rows.push(ChapterRow::Case(case_index));
                    }
                }
            }
        }
        rows
    }

    // ---- Prescription draft ----

    pub fn selected_family(&self) -> Option<&DrugFamily> {
        self.draft.family.and_then(|i| self.catalog.families.get(i))
    }

    pub fn selected_drug(&self) -> Option<&Drug> {
        let family = self.selected_family()?;
        self.draft.drug.and_then(|i| family.drugs.get(i))
    }

    /// (dose, interval, duration) currently chosen
    pub fn draft_values(&self) -> (f64, f64, u32) {
        let options = &self.catalog.options;
        (
            options.doses.get(self.draft.dose).copied().unwrap_or(0.0),
            options.intervals.get(self.draft.interval).copied().unwrap_or(0.0),
            options.durations.get(self.draft.duration).copied().unwrap_or(0),
        )
    }

    /// Total load and shots the current draft would buy
    pub fn draft_preview(&self) -> (f64, u32) {
        let (dose, interval, duration) = self.draft_values();
        let protocol = Protocol::new("", dose, interval, duration);
        (
            load(&protocol),
            estimated_ammo(&protocol, self.tuning.dosing.unit_per_shot),
        )
    }

    pub fn draft_protocol(&self) -> Option<Protocol> {
        let drug = self.selected_drug()?;
        let (dose, interval, duration) = self.draft_values();
        Some(Protocol::new(drug.id.clone(), dose, interval, duration))
    }

    fn adjust_draft(&mut self, forward: bool) {
        let options = &self.catalog.options;
        match self.draft.field {
            RxField::Family => {
                self.draft.family =
                    cycle_optional(self.draft.family, self.catalog.families.len(), forward);
                self.draft.drug = None;
            }
            RxField::Drug => {
                let count = self.selected_family().map_or(0, |f| f.drugs.len());
                self.draft.drug = cycle_optional(self.draft.drug, count, forward);
            }
            RxField::Dose => {
                self.draft.dose = cycle(self.draft.dose, options.doses.len(), forward);
            }
            RxField::Interval => {
                self.draft.interval = cycle(self.draft.interval, options.intervals.len(), forward);
            }
            RxField::Duration => {
                self.draft.duration = cycle(self.draft.duration, options.durations.len(), forward);
            }
        }
    }

    // ---- Input ----

    pub fn on_up(&mut self) {
        match self.screen {
            Screen::Menu => {
                self.menu_index = cycle(self.menu_index, MenuItem::all().len(), false);
            }
            Screen::ChapterSelect => {
                self.chapter_cursor = cycle(self.chapter_cursor, self.chapter_rows().len(), false);
            }
            Screen::Prescription => self.draft.field = self.draft.field.prev(),
            _ => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.screen {
            Screen::Menu => {
                self.menu_index = cycle(self.menu_index, MenuItem::all().len(), true);
            }
            Screen::ChapterSelect => {
                self.chapter_cursor = cycle(self.chapter_cursor, self.chapter_rows().len(), true);
            }
            Screen::Prescription => self.draft.field = self.draft.field.next(),
            _ => {}
        }
    }

    pub fn on_left(&mut self) {
        match self.screen {
            Screen::Prescription => self.adjust_draft(false),
            Screen::Playing => self.nudge_aim(-AIM_STEP),
            _ => {}
        }
    }

    pub fn on_right(&mut self) {
        match self.screen {
            Screen::Prescription => self.adjust_draft(true),
            Screen::Playing => self.nudge_aim(AIM_STEP),
            _ => {}
        }
    }

    pub fn on_enter(&mut self) {
        match self.screen {
            Screen::Menu => match MenuItem::all()[self.menu_index.min(MenuItem::all().len() - 1)] {
                MenuItem::QuickPlay => self.start_random(),
                MenuItem::SelectCase => self.open_chapter_select(),
                MenuItem::Quit => self.should_quit = true,
            },
            Screen::ChapterSelect => match self.chapter_rows().get(self.chapter_cursor) {
                Some(ChapterRow::Section(index)) => self.toggle_section(*index),
                Some(ChapterRow::Case(index)) => self.select_case(*index),
                None => {}
            },
            Screen::Prescription => self.confirm_prescription(),
            Screen::Playing => self.fire(),
            Screen::RoundResult => self.continue_after_result(),
            Screen::GameOver => self.go_home(),
            Screen::Analyzing => {}
        }
    }

    pub fn on_space(&mut self) {
        if self.screen == Screen::Playing {
            self.fire();
        } else {
            self.on_enter();
        }
    }

    pub fn on_escape(&mut self) {
        if self.screen != Screen::Menu {
            self.go_home();
        }
    }

    pub fn toggle_reasoning(&mut self) {
        if self.screen == Screen::Playing {
            self.show_reasoning = !self.show_reasoning;
        }
    }

    /// Pointer moved to a point in arena coordinates
    pub fn aim_at(&mut self, x: f64, y: f64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.aim_at(x, y);
        }
    }

    pub fn nudge_aim(&mut self, delta: f64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.nudge_aim(delta);
        }
    }

    pub fn fire(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.fire();
        }
    }

    // ---- Flow ----

    pub fn open_chapter_select(&mut self) {
        self.screen = Screen::ChapterSelect;
        self.expanded_section = None;
        self.chapter_cursor = 0;
    }

    pub fn toggle_section(&mut self, index: usize) {
        self.expanded_section = if self.expanded_section == Some(index) {
            None
        } else {
            Some(index)
        };
        self.chapter_cursor = self
            .chapter_rows()
            .iter()
            .position(|row| *row == ChapterRow::Section(index))
            .unwrap_or(0);
    }

    pub fn start_random(&mut self) {
        let count = self.catalog.diseases.len();
        if self.progression.begin_random(count, &mut self.vitals).is_none() {
            warn!("catalog has no cases");
            return;
        }
        self.enter_prescription();
    }

    pub fn select_case(&mut self, case_index: usize) {
        if case_index >= self.catalog.diseases.len() {
            return;
        }
        self.progression.begin_sequential(case_index, &mut self.vitals);
        self.enter_prescription();
    }

    fn enter_prescription(&mut self) {
        self.draft = PrescriptionDraft::new(&self.catalog.options);
        self.prescribed = None;
        self.pending = None;
        self.judgment = None;
        self.engine = None;
        self.outcome = None;
        self.show_reasoning = false;
        self.screen = Screen::Prescription;
        if let Some(disease) = self.current_disease() {
            info!(case = %disease.id, level = self.vitals.level(), "case presented");
        }
    }

    pub fn confirm_prescription(&mut self) {
        let Some(protocol) = self.draft_protocol() else {
            return;
        };
        let Some(disease) = self.current_disease() else {
            return;
        };
        let case = CaseDescription::new(&self.catalog, disease, protocol.clone());
        info!(
            case = %disease.id,
            drug = %protocol.substance_id,
            dose = protocol.dose_units,
            interval = protocol.interval_hours,
            duration = protocol.duration_days,
            provider = self.provider.name(),
            "prescription submitted"
        );

        self.pending = Some(PendingJudgment::spawn(Arc::clone(&self.provider), case));
        self.prescribed = Some(protocol);
        self.analyzing_time = 0.0;
        self.screen = Screen::Analyzing;
    }

    fn begin_round(&mut self, judgment: Judgment) {
        let config = match (self.current_disease(), self.prescribed.as_ref()) {
            (Some(disease), Some(prescribed)) => {
                translate_case(&self.tuning, &self.catalog, disease, prescribed, &judgment)
            }
            _ => {
                warn!("judgment arrived without a case, returning to prescription");
                self.screen = Screen::Prescription;
                return;
            }
        };

        let mut engine = Engine::new(config, self.tuning.arena.clone(), self.rng.gen());
        engine.start();
        self.engine = Some(engine);
        self.judgment = Some(judgment);
        self.show_reasoning = false;
        self.screen = Screen::Playing;
    }

    fn finish_round(&mut self, result: RoundResult) {
        let outcome = match (
            self.current_disease(),
            self.prescribed.as_ref(),
            self.judgment.as_ref(),
        ) {
            (Some(disease), Some(prescribed), Some(judgment)) => synthesize_with(
                &self.tuning,
                &result,
                prescribed,
                &disease.reference,
                judgment,
            ),
            _ => return,
        };

        self.vitals.apply(&outcome.vitals_delta);
        info!(success = outcome.success, message = %outcome.message, "round resolved");
        self.outcome = Some(outcome);
        self.screen = if self.vitals.is_game_over() {
            Screen::GameOver
        } else {
            Screen::RoundResult
        };
    }

    pub fn continue_after_result(&mut self) {
        if self.vitals.is_game_over() {
            self.screen = Screen::GameOver;
            return;
        }
        let count = self.catalog.diseases.len();
        if self.progression.advance(count, &mut self.vitals).is_some() {
            self.enter_prescription();
        }
    }

    /// Return to start: vitals and run state back to initial values
    pub fn go_home(&mut self) {
        self.vitals.reset();
        self.pending = None;
        self.prescribed = None;
        self.judgment = None;
        self.engine = None;
        self.outcome = None;
        self.expanded_section = None;
        self.chapter_cursor = 0;
        self.menu_index = 0;
        self.show_reasoning = false;
        self.screen = Screen::Menu;
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f64) {
        match self.screen {
            Screen::Analyzing => {
                self.analyzing_time += dt;
                let resolved = self.pending.as_mut().and_then(|p| p.try_resolve());
                if let Some(judgment) = resolved {
                    self.pending = None;
                    self.begin_round(judgment);
                }
            }
            Screen::Playing => {
                let Some(engine) = self.engine.as_mut() else {
                    return;
                };
                let report = engine.step(dt);
                self.vitals.record_provisional_toxicity(report.miss_toxicity);
                if let Some(result) = report.result {
                    self.finish_round(result);
                }
            }
            _ => {}
        }
    }
}

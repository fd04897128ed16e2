use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::factory::TierPools;
use crate::tier::{select_tier, HardCapRing, ModifierChange, StreakState, TierContext};
use crate::timing::TimeAllocator;
use crate::tracker::{PerformanceTracker, SessionStats, TagPerformance, TypeStats};
use crate::types::{Problem, Tag, Topic};
use crate::weak_area::{SlotContext, WeakAreaInjector};

const MIN_APTITUDE: u8 = 1;
const MAX_APTITUDE: u8 = 10;
const DEFAULT_APTITUDE: u8 = 5;
/// Upper bound on the up-front reservation for one batch
const MAX_BATCH_RESERVE: usize = 1024;

/// End-of-session summary for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub tenure_days: u32,
    pub aptitude: u8,
    pub topic: Option<String>,
    pub attempts: u32,
    pub generated: u32,
    pub fraction_generated: u32,
    pub session_accuracy: f64,
    pub tier_modifier: i8,
    pub weakest_tag: Option<Tag>,
    pub type_stats: BTreeMap<Tag, TypeStats>,
}

/// Session façade: owns all session state and drives generation.
///
/// Purely synchronous. `generate` materializes the whole batch at once;
/// answers recorded afterwards only influence later batches.
pub struct SessionEngine {
    config: EngineConfig,
    rng: ChaCha8Rng,
    allocator: TimeAllocator,
    injector: WeakAreaInjector,
    tenure_days: u32,
    aptitude: u8,
    topic: Option<Topic>,
    pools: TierPools,
    hard_ring: HardCapRing,
    streak: StreakState,
    performance: PerformanceTracker,
    stats: SessionStats,
    generated_by_family: BTreeMap<Tag, u32>,
    total_generated: u32,
}

impl SessionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        let seed = config.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            allocator: TimeAllocator::new(&config),
            injector: WeakAreaInjector::new(&config),
            tenure_days: 0,
            aptitude: DEFAULT_APTITUDE,
            topic: None,
            pools: TierPools::build(0, None),
            hard_ring: HardCapRing::new(),
            streak: StreakState::default(),
            performance: PerformanceTracker::new(),
            stats: SessionStats::new(),
            generated_by_family: BTreeMap::new(),
            total_generated: 0,
            config,
        }
    }

    /// Deterministic engine for replay and tests
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig {
            seed: Some(seed),
            ..EngineConfig::default()
        })
    }

    // ==================== Lifecycle ====================

    /// Reset every piece of session state, including the topic.
    ///
    /// The random stream is not reseeded.
    pub fn initialize(&mut self, tenure_days: u32, aptitude: u8) {
        self.tenure_days = tenure_days;
        self.aptitude = aptitude.clamp(MIN_APTITUDE, MAX_APTITUDE);
        self.topic = None;
        self.pools = TierPools::build(tenure_days, None);
        self.hard_ring.clear();
        self.streak = StreakState::default();
        self.performance.reset();
        self.stats.reset();
        self.generated_by_family.clear();
        self.total_generated = 0;

        info!(
            tenure_days = self.tenure_days,
            aptitude = self.aptitude,
            "session initialized"
        );
    }

    /// Restrict generation to a themed subset, or back to the mixed pools
    pub fn set_topic(&mut self, topic: Option<Topic>) {
        self.topic = topic;
        self.pools = TierPools::build(self.tenure_days, topic);
        info!(topic = ?topic.map(|t| t.key()), "topic changed");
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    // ==================== Generation ====================

    pub fn generate(&mut self, count: usize) -> Vec<Problem> {
        let ctx = self.tier_context();
        let mut problems = Vec::with_capacity(batch_capacity(count));

        for index in 0..count {
            let chosen = select_tier(index, count, &ctx);
            let tier = self.hard_ring.admit(chosen);
            let cap_active = self.fraction_cap_active();

            let slot = SlotContext {
                tier,
                session_attempts: self.streak.attempts,
                fraction_cap_active: cap_active,
                tenure_days: self.tenure_days,
                topic: self.topic,
            };

            let (draft, injected) =
                match self.injector.try_inject(&self.performance, &slot, &mut self.rng) {
                    Some((tag, draft)) => (draft, Some(tag)),
                    None => {
                        let kind = self.pools.draw(
                            tier,
                            cap_active,
                            self.config.max_fraction_redraws,
                            &mut self.rng,
                        );
                        (kind.build(tier, &mut self.rng), None)
                    }
                };

            let time_allotted = self
                .allocator
                .allocate(draft.difficulty_score(), self.performance.get(draft.primary_tag()));
            let problem = draft.finish(tier, time_allotted);

            debug!(
                index,
                chosen = %chosen,
                tier = %problem.tier,
                primary = %problem.primary_tag(),
                score = problem.difficulty_score,
                time_allotted = problem.time_allotted,
                weak_area = ?injected,
                "slot generated"
            );

            self.count_generated(problem.primary_tag());
            problems.push(problem);
        }

        problems
    }

    fn tier_context(&self) -> TierContext {
        TierContext {
            tenure_days: self.tenure_days,
            aptitude: self.aptitude,
            session_accuracy: self.streak.session_accuracy,
            tier_modifier: self.streak.tier_modifier,
        }
    }

    /// Whether another fraction would exceed the session share
    pub fn fraction_cap_active(&self) -> bool {
        if self.pools.is_cap_exempt() {
            return false;
        }
        self.fraction_count() as f64 >= self.config.fraction_cap_ratio * self.total_generated as f64
    }

    fn count_generated(&mut self, primary: Tag) {
        *self.generated_by_family.entry(primary).or_insert(0) += 1;
        self.total_generated += 1;
    }

    // ==================== Feedback ====================

    /// Fold one answered problem into the session statistics.
    ///
    /// Every tag updates its performance record; only `tags[0]` feeds the
    /// report counters. Inconsistent input is recorded as given.
    pub fn record_answer(&mut self, tags: &[Tag], correct: bool, elapsed: f64, allotted: f64) {
        for tag in tags {
            self.performance.record(*tag, correct, elapsed, allotted);
        }
        if let Some(primary) = tags.first() {
            self.stats.record(*primary, correct, elapsed);
        }

        match self.streak.record(correct, elapsed, allotted) {
            Some(ModifierChange::Promoted) => {
                debug!(tier_modifier = self.streak.tier_modifier, "fast streak promoted tier")
            }
            Some(ModifierChange::Demoted) => {
                debug!(tier_modifier = self.streak.tier_modifier, "wrong streak demoted tier")
            }
            None => {}
        }

        trace!(
            tags = ?tags,
            correct,
            elapsed,
            allotted,
            session_accuracy = self.streak.session_accuracy,
            "answer recorded"
        );
    }

    pub fn record_problem(&mut self, problem: &Problem, correct: bool, elapsed: f64) {
        self.record_answer(&problem.tags, correct, elapsed, problem.time_allotted);
    }

    // ==================== Queries ====================

    /// Tag with the highest weakness score, `None` before any answer
    pub fn weakest_tag(&self) -> Option<Tag> {
        self.performance.weakest()
    }

    pub fn type_stats(&self) -> BTreeMap<Tag, TypeStats> {
        self.stats.snapshot()
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            tenure_days: self.tenure_days,
            aptitude: self.aptitude,
            topic: self.topic.map(|t| t.key()),
            attempts: self.streak.attempts,
            generated: self.total_generated,
            fraction_generated: self.fraction_count(),
            session_accuracy: self.streak.session_accuracy,
            tier_modifier: self.streak.tier_modifier,
            weakest_tag: self.weakest_tag(),
            type_stats: self.type_stats(),
        }
    }

    pub fn performance(&self, tag: Tag) -> Option<&TagPerformance> {
        self.performance.get(tag)
    }

    pub fn tier_modifier(&self) -> i8 {
        self.streak.tier_modifier
    }

    pub fn consecutive_fast(&self) -> u32 {
        self.streak.consecutive_fast
    }

    pub fn consecutive_wrong(&self) -> u32 {
        self.streak.consecutive_wrong
    }

    pub fn session_accuracy(&self) -> f64 {
        self.streak.session_accuracy
    }

    pub fn session_attempts(&self) -> u32 {
        self.streak.attempts
    }

    pub fn fraction_count(&self) -> u32 {
        self.generated_by_family
            .get(&Tag::Fractions)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_generated(&self) -> u32 {
        self.total_generated
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn batch_capacity(count: usize) -> usize {
    count.min(MAX_BATCH_RESERVE)
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

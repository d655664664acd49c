use std::{collections::HashMap, ops::ControlFlow, sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};
use validator::Validate;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{
            assessment_session::{AssessmentSession, SessionStatus, SubmitTrigger, TickOutcome},
            SkillAssessment,
        },
        dto::{
            request::{RecordAnswerRequest, StartAssessmentRequest},
            response::{SessionView, SubmissionOutcome},
        },
    },
    repositories::SkillAssessmentRepository,
    services::{
        certification_service::CertificationService,
        integrity_monitor::{IntegrityBus, IntegritySignal},
        proctoring::{CapturedFrame, FrameAnalyzer, FrameSource, UploadedFrameSource},
        question_provider::QuestionSetProvider,
        scoring,
        session_clock::SessionClock,
    },
};

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// How long a submission waits for already-published integrity signals to be
/// applied before grading.
const SIGNAL_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug)]
pub struct SessionSettings {
    pub duration_seconds: u32,
    pub frame_sample_period: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            duration_seconds: config.assessment_duration_secs,
            frame_sample_period: Duration::from_secs(config.frame_sample_interval_secs.max(1)),
        }
    }
}

/// A running session plus every resource it holds open.
struct LiveSession {
    session: AssessmentSession,
    countdown: SessionClock,
    sampler: SessionClock,
    camera: Option<Arc<UploadedFrameSource>>,
    bus: Option<IntegrityBus>,
    subscriber: Option<JoinHandle<()>>,
}

impl LiveSession {
    fn new(session: AssessmentSession, frame_sample_period: Duration) -> Self {
        Self {
            session,
            countdown: SessionClock::new(COUNTDOWN_PERIOD),
            sampler: SessionClock::new(frame_sample_period),
            camera: None,
            bus: None,
            subscriber: None,
        }
    }

    /// Closes every input that can raise integrity flags and hands back the
    /// subscriber task, which finishes once queued signals are applied.
    async fn stop_monitoring(&mut self) -> Option<JoinHandle<()>> {
        self.sampler.stop();
        if let Some(camera) = &self.camera {
            camera.release().await;
        }
        self.bus = None;
        self.subscriber.take()
    }

    async fn teardown(&mut self) {
        self.countdown.stop();
        if let Some(subscriber) = self.stop_monitoring().await {
            subscriber.abort();
        }
        log::debug!("Released timers and camera for assessment {}", self.session.id());
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        // clocks stop themselves when dropped
        if let Some(subscriber) = self.subscriber.take() {
            subscriber.abort();
        }
    }
}

type LiveSlot = Arc<Mutex<LiveSession>>;

struct Inner {
    questions: Arc<dyn QuestionSetProvider>,
    assessments: Arc<dyn SkillAssessmentRepository>,
    certifications: Arc<CertificationService>,
    frame_analyzer: Arc<dyn FrameAnalyzer>,
    settings: SessionSettings,
    live: RwLock<HashMap<String, LiveSlot>>,
}

/// Runs timed assessments. Each live session sits behind its own mutex, so
/// ticks, answers and integrity signals for one session apply one at a time.
#[derive(Clone)]
pub struct AssessmentService {
    inner: Arc<Inner>,
}

impl AssessmentService {
    pub fn new(
        questions: Arc<dyn QuestionSetProvider>,
        assessments: Arc<dyn SkillAssessmentRepository>,
        certifications: Arc<CertificationService>,
        frame_analyzer: Arc<dyn FrameAnalyzer>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                questions,
                assessments,
                certifications,
                frame_analyzer,
                settings,
                live: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub async fn start_assessment(&self, request: StartAssessmentRequest) -> AppResult<SessionView> {
        request.validate()?;
        let skill_name = request.skill_name.trim();

        let questions = self
            .inner
            .questions
            .fetch(skill_name, request.difficulty)
            .await
            .map_err(|e| {
                log::error!("Question set for '{}' could not be fetched: {}", skill_name, e);
                e
            })?;

        let mut session = AssessmentSession::new(
            &request.user_id,
            skill_name,
            request.difficulty,
            questions,
            self.inner.settings.duration_seconds,
        )
        .map_err(|e| {
            log::warn!("Refusing to start '{}' assessment: {}", skill_name, e);
            e
        })?;
        session.start(Utc::now())?;

        let id = session.id().to_string();
        let proctored = session.proctoring_enabled();
        let view = SessionView::from(&session);

        let slot = Arc::new(Mutex::new(LiveSession::new(
            session,
            self.inner.settings.frame_sample_period,
        )));
        self.inner
            .live
            .write()
            .await
            .insert(id.clone(), Arc::clone(&slot));

        {
            let mut live = slot.lock().await;
            self.start_countdown(&id, &slot, &mut live);
            if proctored {
                self.start_proctoring(&id, &slot, &mut live);
            }
        }

        log::info!(
            "Started {} assessment {} for user {} on '{}' (proctoring: {})",
            request.difficulty,
            id,
            request.user_id,
            skill_name,
            proctored
        );
        Ok(view)
    }

    fn start_countdown(&self, id: &str, slot: &LiveSlot, live: &mut LiveSession) {
        let slot = Arc::downgrade(slot);
        let service = Arc::downgrade(&self.inner);
        let id = id.to_string();

        live.countdown.start(move || {
            let slot = slot.clone();
            let service = service.clone();
            let id = id.clone();
            async move {
                let Some(slot) = slot.upgrade() else {
                    return ControlFlow::Break(());
                };
                let outcome = slot.lock().await.session.tick();

                match outcome {
                    TickOutcome::Running { .. } => ControlFlow::Continue(()),
                    TickOutcome::Idle => ControlFlow::Break(()),
                    TickOutcome::Expired => {
                        log::info!("Assessment {} ran out of time", id);
                        if let Some(inner) = service.upgrade() {
                            let service = AssessmentService { inner };
                            // a separate task, since submission stops this clock
                            tokio::spawn(async move {
                                if let Err(e) = service.submit_with(&id, SubmitTrigger::Timer).await {
                                    log::warn!("Timed submission of assessment {} failed: {}", id, e);
                                }
                            });
                        }
                        ControlFlow::Break(())
                    }
                }
            }
        });
    }

    fn start_proctoring(&self, id: &str, slot: &LiveSlot, live: &mut LiveSession) {
        let camera = Arc::new(UploadedFrameSource::new());
        let (bus, mut subscription) = IntegrityBus::channel();

        let weak_slot = Arc::downgrade(slot);
        let session_id = id.to_string();
        live.subscriber = Some(tokio::spawn(async move {
            while let Some(signal) = subscription.next().await {
                let Some(slot) = weak_slot.upgrade() else {
                    break;
                };
                let mut live = slot.lock().await;
                if let Some(flag) = live.session.apply_signal(&signal) {
                    log::info!(
                        "Integrity flag on assessment {}: {:?} ({:?}) {}",
                        session_id,
                        flag.flag_type,
                        flag.severity,
                        flag.detail
                    );
                }
            }
        }));

        let source: Arc<dyn FrameSource> = camera.clone();
        let analyzer = Arc::clone(&self.inner.frame_analyzer);
        let sampler_bus = bus.clone();
        let session_id = id.to_string();
        live.sampler.start(move || {
            let source = Arc::clone(&source);
            let analyzer = Arc::clone(&analyzer);
            let bus = sampler_bus.clone();
            let session_id = session_id.clone();
            async move { sample_frame(&session_id, source.as_ref(), analyzer.as_ref(), &bus).await }
        });

        live.camera = Some(camera);
        live.bus = Some(bus);
    }

    async fn live_slot(&self, id: &str) -> AppResult<LiveSlot> {
        self.inner
            .live
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No live assessment with id '{}'", id)))
    }

    pub async fn get_session(&self, id: &str) -> AppResult<SessionView> {
        let slot = self.live_slot(id).await?;
        let live = slot.lock().await;
        Ok(SessionView::from(&live.session))
    }

    pub async fn record_answer(
        &self,
        id: &str,
        question_index: usize,
        request: RecordAnswerRequest,
    ) -> AppResult<SessionView> {
        request.validate()?;
        let slot = self.live_slot(id).await?;
        let mut live = slot.lock().await;

        live.session
            .record_answer(question_index, &request.answer_value, Utc::now())?;
        Ok(SessionView::from(&live.session))
    }

    pub async fn next_question(&self, id: &str) -> AppResult<SessionView> {
        let slot = self.live_slot(id).await?;
        let mut live = slot.lock().await;

        live.session.next_question(Utc::now())?;
        Ok(SessionView::from(&live.session))
    }

    pub async fn previous_question(&self, id: &str) -> AppResult<SessionView> {
        let slot = self.live_slot(id).await?;
        let mut live = slot.lock().await;

        live.session.previous_question(Utc::now())?;
        Ok(SessionView::from(&live.session))
    }

    /// The candidate's tab or window lost visibility. Ignored for sessions
    /// without proctoring.
    pub async fn report_visibility_lost(&self, id: &str) -> AppResult<()> {
        let slot = self.live_slot(id).await?;
        let live = slot.lock().await;

        if !live.session.proctoring_enabled() {
            log::debug!("Visibility change ignored for unproctored assessment {}", id);
            return Ok(());
        }

        let bus = live.bus.as_ref().ok_or_else(|| {
            AppError::InvalidState(format!("assessment {} is no longer monitored", id))
        })?;
        bus.publish(IntegritySignal::VisibilityLost { at: Utc::now() })
    }

    /// Stores the newest camera frame for the next sampling tick.
    pub async fn upload_frame(&self, id: &str, content_type: &str, data: Vec<u8>) -> AppResult<()> {
        let slot = self.live_slot(id).await?;
        let camera = {
            let live = slot.lock().await;
            live.camera.clone().ok_or_else(|| {
                AppError::InvalidState(format!("assessment {} is not proctored", id))
            })?
        };

        camera
            .push(CapturedFrame {
                captured_at: Utc::now(),
                content_type: content_type.to_string(),
                data,
            })
            .await
    }

    pub async fn submit(&self, id: &str) -> AppResult<SubmissionOutcome> {
        self.submit_with(id, SubmitTrigger::User).await
    }

    async fn submit_with(&self, id: &str, trigger: SubmitTrigger) -> AppResult<SubmissionOutcome> {
        let slot = match self.live_slot(id).await {
            Ok(slot) => slot,
            Err(err) => {
                if self.inner.assessments.find_by_id(id).await?.is_some() {
                    return Err(AppError::InvalidState(format!(
                        "assessment {} has already been submitted",
                        id
                    )));
                }
                return Err(err);
            }
        };

        let pending_signals = {
            let mut live = slot.lock().await;
            if live.session.status() != SessionStatus::InProgress {
                return Err(AppError::InvalidState(format!(
                    "assessment {} is not in progress",
                    id
                )));
            }
            live.stop_monitoring().await
        };
        if let Some(mut subscriber) = pending_signals {
            if tokio::time::timeout(SIGNAL_DRAIN_TIMEOUT, &mut subscriber)
                .await
                .is_err()
            {
                log::warn!("Integrity signals for assessment {} were not drained in time", id);
                subscriber.abort();
            }
        }

        let now = Utc::now();
        let record = {
            let mut live = slot.lock().await;
            let reason = live.session.close(trigger, now)?;
            live.teardown().await;

            let session = &live.session;
            let result = scoring::evaluate(
                session.questions(),
                session.answers(),
                session.flags(),
                session.difficulty(),
                session.elapsed_seconds(),
            );
            log::info!(
                "Assessment {} submitted ({:?}): score {}, passed {}, {} flags",
                id,
                reason,
                result.score,
                result.passed,
                result.flags.len()
            );
            SkillAssessment::from_session(session, result, now)
        };
        self.inner.live.write().await.remove(id);

        let assessment = self.inner.assessments.create(record).await.map_err(|e| {
            log::error!("Failed to persist assessment {}: {}", id, e);
            e
        })?;

        // the assessment is stored either way; a missing certification is only logged
        let certification = match self.inner.certifications.issue_for(&assessment, now).await {
            Ok(certification) => certification,
            Err(e) => {
                log::error!(
                    "Assessment {} passed but its certification was not stored: {}",
                    id,
                    e
                );
                None
            }
        };

        Ok(SubmissionOutcome {
            assessment,
            certification,
        })
    }

    /// Leaves a session without grading it. Nothing is persisted.
    pub async fn abandon(&self, id: &str) -> AppResult<()> {
        let slot = self
            .inner
            .live
            .write()
            .await
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("No live assessment with id '{}'", id)))?;

        let mut live = slot.lock().await;
        // a submit already holding this slot fails its close from here on
        live.session.abandon(Utc::now())?;
        live.teardown().await;
        log::info!("Assessment {} abandoned", id);
        Ok(())
    }

    pub async fn get_result(&self, id: &str) -> AppResult<SkillAssessment> {
        self.inner
            .assessments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assessment with id '{}' not found", id)))
    }

    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<SkillAssessment>> {
        self.inner.assessments.list_by_user(user_id).await
    }

    pub async fn live_session_count(&self) -> usize {
        self.inner.live.read().await.len()
    }
}

/// One frame-sampling tick: analyze the newest frame, if any, and publish a
/// finding. Analysis runs without holding the session lock.
async fn sample_frame(
    session_id: &str,
    source: &dyn FrameSource,
    analyzer: &dyn FrameAnalyzer,
    bus: &IntegrityBus,
) -> ControlFlow<()> {
    if source.is_released() {
        return ControlFlow::Break(());
    }
    let Some(frame) = source.latest_frame().await else {
        return ControlFlow::Continue(());
    };

    match analyzer.analyze(&frame).await {
        Ok(Some(finding)) => {
            let signal = IntegritySignal::FrameFinding {
                finding,
                at: frame.captured_at,
            };
            if bus.publish(signal).is_err() {
                return ControlFlow::Break(());
            }
        }
        Ok(None) => {}
        Err(e) => log::warn!("Frame analysis for assessment {} failed: {}", session_id, e),
    }
    ControlFlow::Continue(())
}

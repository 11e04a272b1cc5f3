//! Operator prompts and the templates they are rendered from.

use minijinja::Environment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A blocking question put to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub message: String,
    /// Label of the affirmative button.
    pub accept: String,
    /// Label of the negative button, when the prompt is a yes/no question.
    pub decline: Option<String>,
}

/// The operator's answer to a [`PromptRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptReply {
    /// The affirmative button was pressed.
    Accepted,
    /// The negative button was pressed.
    Declined,
    /// The dialog was cancelled or closed.
    Dismissed,
}

/// Which prompt in the session flow is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Shown before the timer starts.
    SessionStart,
    /// Shown while the timer runs; confirmed when it ends.
    TimerEnd,
    /// "Is the task fully resolved?"
    Resolution,
    /// "Should the task be scheduled again?"
    Revisit,
    /// Reorder checkpoint during a full rebuild.
    OrderCheckpoint,
}

/// Values available to prompt templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    /// Repository key of the task.
    pub repository: String,
    /// Task title.
    pub title: String,
    /// `<repo>$<title>` as shown to the operator.
    pub task: String,
    /// Session length in duration units.
    pub units: u32,
    /// Session length in minutes.
    pub minutes: u32,
    /// Ready pool contents, for the ordering checkpoint.
    pub ready: Vec<String>,
}

/// Template for one prompt. `title` and `message` are minijinja templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Title template.
    pub title: String,
    /// Body template.
    pub message: String,
    /// Affirmative button label.
    pub accept: String,
    /// Negative button label.
    #[serde(default)]
    pub decline: Option<String>,
}

impl PromptTemplate {
    fn new(title: &str, message: &str, accept: &str, decline: Option<&str>) -> Self {
        Self {
            title: title.to_owned(),
            message: message.to_owned(),
            accept: accept.to_owned(),
            decline: decline.map(str::to_owned),
        }
    }
}

/// Error raised when a prompt template fails to render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render {kind:?} prompt: {reason}")]
pub struct TemplateError {
    /// Prompt being rendered.
    pub kind: PromptKind,
    /// Renderer message.
    pub reason: String,
}

/// Every prompt used by the session flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// Session start prompt.
    pub session_start: PromptTemplate,
    /// Timer end prompt.
    pub timer_end: PromptTemplate,
    /// Resolution question.
    pub resolution: PromptTemplate,
    /// Revisit question.
    pub revisit: PromptTemplate,
    /// Ordering checkpoint.
    pub order_checkpoint: PromptTemplate,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            session_start: PromptTemplate::new(
                "Task Start",
                "请打开飞书会议, 标题为{{ task }} 自我审视+ 反思 + 分析笔记",
                "完成",
                None,
            ),
            timer_end: PromptTemplate::new(
                "计时结束",
                "需要结束计时任务吗? ({{ minutes }} 分钟)",
                "结束",
                None,
            ),
            resolution: PromptTemplate::new(
                "Task End",
                "标题为{{ task }} 的任务是否彻底完成",
                "是",
                Some("否"),
            ),
            revisit: PromptTemplate::new(
                "Task End",
                "标题为{{ task }} 的任务需要重新排期吗?",
                "是",
                Some("否"),
            ),
            order_checkpoint: PromptTemplate::new(
                "调整",
                "调整时间和顺序 (就绪 {{ ready | length }} 项)",
                "继续",
                Some("取消"),
            ),
        }
    }
}

impl PromptTemplates {
    /// Returns the template for `kind`.
    #[must_use]
    pub const fn template(&self, kind: PromptKind) -> &PromptTemplate {
        match kind {
            PromptKind::SessionStart => &self.session_start,
            PromptKind::TimerEnd => &self.timer_end,
            PromptKind::Resolution => &self.resolution,
            PromptKind::Revisit => &self.revisit,
            PromptKind::OrderCheckpoint => &self.order_checkpoint,
        }
    }

    /// Renders the prompt for `kind` with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when a template is malformed.
    pub fn render(
        &self,
        kind: PromptKind,
        context: &PromptContext,
    ) -> Result<PromptRequest, TemplateError> {
        let template = self.template(kind);
        let environment = Environment::new();
        let render = |source: &str| {
            environment
                .render_str(source, context)
                .map_err(|error| TemplateError {
                    kind,
                    reason: error.to_string(),
                })
        };
        Ok(PromptRequest {
            title: render(&template.title)?,
            message: render(&template.message)?,
            accept: template.accept.clone(),
            decline: template.decline.clone(),
        })
    }
}

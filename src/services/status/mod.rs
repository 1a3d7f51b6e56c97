// 状态模型与编排
//
// - state: 状态模型和纯状态转换
// - view: 由状态推导界面状态
// - notifier: 用户通知出口
// - orchestrator: 控制上下文，调度后台任务

pub mod notifier;
pub mod orchestrator;
pub mod state;
pub mod view;

pub use notifier::{CollectingNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use orchestrator::{JobContext, Orchestrator};
pub use state::{
    transition, Event, Job, JobOutcome, Phase, Rejection, ScriptOutcome, StatusModel, Transition,
    Trigger,
};
pub use view::{derive_view, Compatibility, ViewState};

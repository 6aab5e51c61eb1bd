use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::dom::ElementId;
use crate::media::ObserverGroup;
use crate::subscription::{Subscription, SubscriptionId};

/// Imperative document requests that cannot be expressed as view state.
///
/// All of them are notifications: the shell performs them and never replies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BrowserOperation {
    Focus { element: ElementId },
    /// Focus a non-interactive element through a temporary `tabindex="-1"`
    /// that the shell removes again on blur.
    FocusSection { element: ElementId },
    /// `preventDefault()` on the key event currently being dispatched.
    ConsumeKey,
    ScrollTo { top: f64, smooth: bool },
    PushHistory { href: String },
    Navigate { url: String },
    /// Synthesised click on a link.
    Activate { element: ElementId },
    Listen(Subscription),
    Unlisten { id: SubscriptionId },
    /// `new IntersectionObserver(cb, { rootMargin, threshold })` over the targets.
    Observe {
        group: ObserverGroup,
        root_margin: String,
        threshold: f64,
        targets: Vec<ElementId>,
    },
    Unobserve {
        group: ObserverGroup,
        target: ElementId,
    },
    Disconnect { group: ObserverGroup },
    ObserveLongTasks,
    /// Forward to the page's analytics hook when one exists.
    Analytics { event: String, value: f64 },
}

impl Operation for BrowserOperation {
    type Output = ();
}

pub struct Browser<Ev> {
    context: CapabilityContext<BrowserOperation, Ev>,
}

impl<Ev> Capability<Ev> for Browser<Ev> {
    type Operation = BrowserOperation;
    type MappedSelf<MappedEv> = Browser<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Browser::new(self.context.map_event(f))
    }
}

impl<Ev> Browser<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<BrowserOperation, Ev>) -> Self {
        Self { context }
    }

    fn notify(&self, operation: BrowserOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }

    pub fn focus(&self, element: ElementId) {
        self.notify(BrowserOperation::Focus { element });
    }

    pub fn focus_section(&self, element: ElementId) {
        self.notify(BrowserOperation::FocusSection { element });
    }

    pub fn consume_key(&self) {
        self.notify(BrowserOperation::ConsumeKey);
    }

    pub fn scroll_to(&self, top: f64, smooth: bool) {
        self.notify(BrowserOperation::ScrollTo { top, smooth });
    }

    pub fn push_history(&self, href: impl Into<String>) {
        self.notify(BrowserOperation::PushHistory { href: href.into() });
    }

    pub fn navigate(&self, url: impl Into<String>) {
        self.notify(BrowserOperation::Navigate { url: url.into() });
    }

    pub fn activate(&self, element: ElementId) {
        self.notify(BrowserOperation::Activate { element });
    }

    pub fn listen(&self, subscription: Subscription) {
        self.notify(BrowserOperation::Listen(subscription));
    }

    pub fn unlisten(&self, id: SubscriptionId) {
        self.notify(BrowserOperation::Unlisten { id });
    }

    pub fn observe(&self, group: ObserverGroup, targets: Vec<ElementId>) {
        self.notify(BrowserOperation::Observe {
            group,
            root_margin: group.root_margin().to_string(),
            threshold: group.threshold(),
            targets,
        });
    }

    pub fn unobserve(&self, group: ObserverGroup, target: ElementId) {
        self.notify(BrowserOperation::Unobserve { group, target });
    }

    pub fn disconnect(&self, group: ObserverGroup) {
        self.notify(BrowserOperation::Disconnect { group });
    }

    pub fn observe_long_tasks(&self) {
        self.notify(BrowserOperation::ObserveLongTasks);
    }

    pub fn analytics(&self, event: impl Into<String>, value: f64) {
        self.notify(BrowserOperation::Analytics {
            event: event.into(),
            value,
        });
    }
}

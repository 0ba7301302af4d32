//! 跨浏览器上下文的发布/订阅模块
//!
//! `EventBus` 把消息分发给所有挂载的传输通道，并把它们投递的消息合并到同一个订阅中。
//! 核心库自带进程内的 `LocalBroadcast`；浏览器 crate 另外提供 storage 事件和
//! 页内 `CustomEvent` 两种传输。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// 每条投递消息都会调用的回调
pub type Listener<M> = Rc<dyn Fn(M)>;

/// 订阅句柄：Drop 或调用 [`Subscription::cancel`] 时注销监听器
#[must_use = "dropping a Subscription detaches the listener"]
pub struct Subscription {
    cancels: Vec<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancels: vec![Box::new(cancel)],
        }
    }

    /// 无需撤销任何东西的空订阅
    pub fn empty() -> Self {
        Self {
            cancels: Vec::new(),
        }
    }

    fn merge(&mut self, mut other: Subscription) {
        self.cancels.append(&mut other.cancels);
    }

    pub fn cancel(mut self) {
        self.run_cancels();
    }

    fn run_cancels(&mut self) {
        for cancel in self.cancels.drain(..) {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancels();
    }
}

/// 传输通道特性 (Trait)：在消费者之间传递消息的一种方式
pub trait BroadcastTransport<M> {
    fn publish(&self, message: &M);
    fn subscribe(&self, listener: Listener<M>) -> Subscription;
}

// =========================================================
// 事件总线 (EventBus)
// =========================================================

pub struct EventBus<M> {
    transports: Vec<Box<dyn BroadcastTransport<M>>>,
}

impl<M> Default for EventBus<M> {
    fn default() -> Self {
        Self {
            transports: Vec::new(),
        }
    }
}

impl<M: 'static> EventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(mut self, transport: impl BroadcastTransport<M> + 'static) -> Self {
        self.transports.push(Box::new(transport));
        self
    }

    pub fn publish(&self, message: &M) {
        for transport in &self.transports {
            transport.publish(message);
        }
    }

    /// 把 `listener` 挂到每个传输通道上
    pub fn subscribe(&self, listener: impl Fn(M) + 'static) -> Subscription {
        let listener: Listener<M> = Rc::new(listener);
        let mut subscription = Subscription::empty();
        for transport in &self.transports {
            subscription.merge(transport.subscribe(listener.clone()));
        }
        subscription
    }
}

// =========================================================
// 进程内广播 (LocalBroadcast)
// =========================================================

struct Slot<M> {
    id: u64,
    listener: Listener<M>,
}

struct Channel<M> {
    next_id: Cell<u64>,
    slots: RefCell<Vec<Slot<M>>>,
}

/// 进程内传输，克隆体共享同一个通道
///
/// 会投递给所有订阅者（包括发布者自己），由消费者自行过滤自己的消息。
pub struct LocalBroadcast<M> {
    channel: Rc<Channel<M>>,
}

impl<M> Clone for LocalBroadcast<M> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<M> Default for LocalBroadcast<M> {
    fn default() -> Self {
        Self {
            channel: Rc::new(Channel {
                next_id: Cell::new(0),
                slots: RefCell::new(Vec::new()),
            }),
        }
    }
}

impl<M> LocalBroadcast<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.channel.slots.borrow().len()
    }
}

impl<M: Clone + 'static> BroadcastTransport<M> for LocalBroadcast<M> {
    fn publish(&self, message: &M) {
        // 先取快照，回调执行期间允许订阅或退订
        let listeners: Vec<Listener<M>> = self
            .channel
            .slots
            .borrow()
            .iter()
            .map(|slot| slot.listener.clone())
            .collect();
        for listener in listeners {
            listener(message.clone());
        }
    }

    fn subscribe(&self, listener: Listener<M>) -> Subscription {
        let id = self.channel.next_id.get();
        self.channel.next_id.set(id + 1);
        self.channel.slots.borrow_mut().push(Slot { id, listener });

        let channel = Rc::downgrade(&self.channel);
        Subscription::new(move || {
            if let Some(channel) = channel.upgrade() {
                channel.slots.borrow_mut().retain(|slot| slot.id != id);
            }
        })
    }
}

use std::sync::{Arc, LazyLock};

use bevy::prelude::*;
use parking_lot::Mutex;
use ribbit_bits::{BitDuration, BitMessage, BitParameters, BitResult, RibbitMessage};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

/// Messages posted by the host page, waiting for the next `PostUpdate`.
pub static RIBBIT_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<RibbitMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

/// Lets the host drive a bit. Implementations are called by the plugin only,
/// never by the bit's own systems.
pub trait RibbitMessageHandler: Send + Sync + Default + 'static {
    fn duration(world: &mut World) -> BitDuration;
    fn end(world: &mut World) -> BitResult;
    fn restart(world: &mut World);
}

#[cfg(target_arch = "wasm32")]
fn listen_ribbit_messages() {
    let Some(window) = web_sys::window() else {
        error!("no global `window` exists, ribbit messages disabled");
        return;
    };

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        match serde_wasm_bindgen::from_value::<RibbitMessage>(event.data()) {
            Ok(message) => RIBBIT_MESSAGE_QUEUE.lock().push(message),
            Err(err) => error!("Could not parse ribbit message {:?}: {err}", event.data()),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(err) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("failed to add message event listener: {err:?}");
        return;
    }

    // The listener lives as long as the page.
    closure.forget();
}

/// Native builds have no parent page to post to.
#[cfg(not(target_arch = "wasm32"))]
pub fn send_bit_message(message: BitMessage) {
    info!("Bit message: {message:?}");
}

#[cfg(target_arch = "wasm32")]
pub fn send_bit_message(message: BitMessage) {
    let Some(window) = web_sys::window() else {
        error!("{message:?} not sent, no global `window` exists.");
        return;
    };
    let Ok(payload) = serde_wasm_bindgen::to_value(&message) else {
        error!("Could not serialize {message:?}");
        return;
    };
    let Ok(Some(parent_window)) = window.parent() else {
        error!("{message:?} not sent, parent_window not found.");
        return;
    };
    if let Err(err) = parent_window.post_message(&payload, "*") {
        error!("Could not post message {payload:?}. {err:?}");
    }
}

/// Runs the handler for one host message and returns the reply, if the
/// protocol expects one.
pub fn answer_ribbit_message<T: RibbitMessageHandler>(
    world: &mut World,
    message: RibbitMessage,
) -> Option<BitMessage> {
    match message {
        RibbitMessage::Parameters => Some(BitMessage::Parameters(BitParameters {
            duration: T::duration(world),
        })),
        RibbitMessage::End => Some(BitMessage::End(T::end(world))),
        RibbitMessage::Restart => {
            T::restart(world);
            None
        }
        // Bits start playing as soon as they are loaded.
        RibbitMessage::Start => None,
    }
}

fn process_ribbit_messages<T: RibbitMessageHandler>(world: &mut World) {
    let messages: Vec<_> = RIBBIT_MESSAGE_QUEUE.lock().drain(..).collect();
    for message in messages {
        if let Some(reply) = answer_ribbit_message::<T>(world, message) {
            send_bit_message(reply);
        }
    }
}

fn ready() {
    send_bit_message(BitMessage::Ready);
}

#[derive(Default)]
pub struct RibbitCommunicationPlugin<T: RibbitMessageHandler>(core::marker::PhantomData<T>);

impl<T: RibbitMessageHandler> Plugin for RibbitCommunicationPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, process_ribbit_messages::<T>);
        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, listen_ribbit_messages);
        app.add_systems(PostStartup, ready);
    }
}

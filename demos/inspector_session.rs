//! # Inspector Session
//!
//! Opens an inspector for a stored Control Change button, replays a few host
//! messages and form edits, and prints every request the host would receive.
//!
//! **Concepts:** `PropertyInspector`, `HostBridge`, host JSON envelopes
//!
//! ```bash
//! cargo run --example inspector_session
//! ```

use midibutton::prelude::*;
use std::thread;

fn main() -> midibutton::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (bridge, requests) = bridge_channel();

    // Stand-in transport: writes each request as the JSON the host socket expects.
    let transport = thread::spawn(move || {
        for request in requests {
            match request.to_json() {
                Ok(text) => println!("-> {text}"),
                Err(e) => eprintln!("cannot serialize {}: {e}", request.event()),
            }
        }
    });

    let info = ConnectInfo::from_action_info(
        "PI-DEMO",
        r#"{"action":"uk.co.clarionmusic.midibutton.cc","context":"BUTTON-1",
            "payload":{"settings":{"midiChannel":1,"midiCC":74,"midiValue":0,"midiValueSec":127}}}"#,
    )?;
    let mut inspector = PropertyInspector::connect(bridge, info, HostPlatform::current());
    println!("opened {:?} record: {:?}", inspector.revision(), inspector.config());

    inspector.handle_text(
        r#"{"event":"didReceiveGlobalSettings","payload":{"settings":{"printDebug":true}}}"#,
    )?;
    inspector.handle_text(
        r#"{"event":"sendToPropertyInspector","payload":
            {"event":"midiOutPorts","midiOutPortList":{"IAC Driver Bus 1":"0","Synth":"1"}}}"#,
    )?;

    inspector.apply(FieldEdit::CcMode(CcMode::FadeIn));
    inspector.apply(FieldEdit::FadeTime(2.0));
    inspector.apply(FieldEdit::FadeCurve(1.5));
    inspector.edit_global(GlobalEdit::OutPort(1));

    println!("press: {:?}", respond(inspector.config(), KeyEvent::press()));

    drop(inspector);
    if transport.join().is_err() {
        eprintln!("transport thread panicked");
    }
    Ok(())
}

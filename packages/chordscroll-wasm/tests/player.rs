// Player tests against a real browser window (requestAnimationFrame,
// performance.now()). Run with `wasm-pack test --headless --chrome`.

#[cfg(all(test, target_arch = "wasm32"))]
mod player_tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chordscroll_wasm::ScrollPlayer;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const SONG: &str = "[C]one [G]two\n[F]three";

    fn flag(state: &JsValue, name: &str) -> Option<bool> {
        js_sys::Reflect::get(state, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_bool())
    }

    fn as_function(closure: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function {
        closure.as_ref().unchecked_ref::<js_sys::Function>().clone()
    }

    #[wasm_bindgen_test]
    fn test_subscriber_can_call_back_into_player() {
        let player = Rc::new(ScrollPlayer::new(SONG, Some(120.0), None).unwrap());
        let reads = Rc::new(RefCell::new(Vec::new()));

        let (weak, log) = (Rc::downgrade(&player), reads.clone());
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_state: JsValue| {
            let Some(player) = weak.upgrade() else { return };
            log.borrow_mut().push(player.state().is_ok() && player.elapsed_ms().is_ok());
            player.pause().unwrap();
        });
        player.subscribe(as_function(&callback));

        // start -> active; the pause inside the callback -> paused
        player.start().unwrap();
        assert_eq!(*reads.borrow(), vec![true, true]);

        let state = player.state().unwrap();
        assert_eq!(flag(&state, "isActive"), Some(true));
        assert_eq!(flag(&state, "isPaused"), Some(true));
        player.stop().unwrap();
    }

    #[wasm_bindgen_test]
    fn test_unsubscribe_from_inside_subscriber() {
        let player = Rc::new(ScrollPlayer::new(SONG, None, None).unwrap());
        let calls = Rc::new(Cell::new(0));
        let id = Rc::new(Cell::new(0));

        let (weak, count, own_id) = (Rc::downgrade(&player), calls.clone(), id.clone());
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_state: JsValue| {
            count.set(count.get() + 1);
            if let Some(player) = weak.upgrade() {
                assert!(player.unsubscribe(own_id.get()));
            }
        });
        id.set(player.subscribe(as_function(&callback)));

        player.start().unwrap();
        player.pause().unwrap();
        player.stop().unwrap();
        assert_eq!(calls.get(), 1);
        assert!(!player.unsubscribe(id.get()));
    }

    #[wasm_bindgen_test]
    fn test_trace_receives_events() {
        let player = ScrollPlayer::new(SONG, None, None).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));

        let sink = events.clone();
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let name = js_sys::Reflect::get(&event, &JsValue::from_str("event"))
                .ok()
                .and_then(|v| v.as_string());
            sink.borrow_mut().push(name.unwrap_or_default());
        });
        player.set_trace(Some(as_function(&callback))).unwrap();

        player.start().unwrap();
        player.set_bpm(45.0).unwrap();
        player.stop().unwrap();
        assert_eq!(*events.borrow(), vec!["started", "tempoChanged", "stopped"]);

        player.set_trace(None).unwrap();
        player.start().unwrap();
        assert_eq!(events.borrow().len(), 3);
        player.stop().unwrap();
    }

    #[wasm_bindgen_test]
    fn test_throwing_trace_hook_does_not_break_player() {
        let player = ScrollPlayer::new(SONG, None, None).unwrap();
        let throws = js_sys::Function::new_no_args("throw new Error('boom')");
        player.set_trace(Some(throws)).unwrap();

        player.start().unwrap();
        player.stop().unwrap();
        assert_eq!(flag(&player.state().unwrap(), "isActive"), Some(false));
    }
}

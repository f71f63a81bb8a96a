use std::cell::RefCell;
use std::rc::Rc;

use hookcell_core::prelude::*;

/// Handlers a page would wire to its buttons.
#[derive(Clone)]
struct Buttons {
    count: SetState<i32>,
}

fn counter(
    title: &'static str,
    buttons: Rc<RefCell<Option<Buttons>>>,
) -> impl Fn(&Cx) -> Result<String> + 'static {
    move |cx: &Cx| {
        let (count, set_count) = cx.use_state(0)?;
        *buttons.borrow_mut() = Some(Buttons { count: set_count });

        cx.use_effect(deps![count], move || {
            log::info!("{title}: count is now {count}");
            on_cleanup(move || log::debug!("{title}: leaving {count}"))
        })?;

        Ok(format!(
            "<section><h2>{title}</h2><p>Count: {count}</p>\
             <button>+</button><button>-</button></section>"
        ))
    }
}

fn target(label: &'static str) -> RenderTarget {
    RenderTarget::labeled(label, move |html: &str| println!("[{label}] {html}"))
}

fn buttons(slot: &Rc<RefCell<Option<Buttons>>>) -> anyhow::Result<Buttons> {
    slot.borrow()
        .clone()
        .ok_or_else(|| anyhow::anyhow!("component has not rendered yet"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let rt = Runtime::new();
    let left_buttons = Rc::new(RefCell::new(None));
    let right_buttons = Rc::new(RefCell::new(None));
    let left = target("left");
    let right = target("right");

    rt.render(counter("Left", left_buttons.clone()), &left)?;
    rt.render(counter("Right", right_buttons.clone()), &right)?;

    // Simulated clicks.
    buttons(&left_buttons)?.count.update(|c| c + 1)?;
    buttons(&left_buttons)?.count.update(|c| c + 1)?;
    buttons(&right_buttons)?.count.update(|c| c - 1)?;
    buttons(&left_buttons)?.count.set(5)?;

    rt.unmount(&left)?;
    rt.unmount(&right)?;
    Ok(())
}

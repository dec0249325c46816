//! Primary call-to-action button

use dioxus::prelude::*;

use crate::theme::{DISPLAY_FONT, ELDRITCH_PALETTE};

#[component]
pub fn EldritchButton(
    onclick: EventHandler<MouseEvent>,
    #[props(default)] disabled: bool,
    children: Element,
) -> Element {
    let colors = ELDRITCH_PALETTE;
    let (opacity, cursor) = if disabled {
        ("0.5", "not-allowed")
    } else {
        ("1", "pointer")
    };

    rsx! {
        button {
            r#type: "button",
            disabled,
            style: "
                padding: 12px 24px;
                background: {colors.blood};
                border: 1px solid {colors.blood_bright};
                color: {colors.text_primary};
                font-family: {DISPLAY_FONT};
                letter-spacing: 0.1em;
                text-transform: uppercase;
                border-radius: 2px;
                opacity: {opacity};
                cursor: {cursor};
                width: 100%;
            ",
            onclick: move |evt| {
                if !disabled {
                    onclick.call(evt);
                }
            },
            {children}
        }
    }
}

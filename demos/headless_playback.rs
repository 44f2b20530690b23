//! Headless playback demo.
//!
//! Loads a two-part rig from JSON, plays it for one second at a fixed
//! 60 Hz step and prints each part's world position.
//!
//! Run with `RUST_LOG=debug cargo run --example headless_playback`.

use anyhow::Result;

use kinetree::animation::Easing;
use kinetree::assets::save_articulated_string;
use kinetree::scene::{RenderItem, Selection, Transformation};
use kinetree::settings::EditorSettings;

const RIG: &str = r#"{
    "root": [
        {
            "component": "arm",
            "children": [
                {
                    "component": "hand",
                    "children": [],
                    "model": {
                        "mesh": { "faces": [] },
                        "keyframes": [
                            {"px":0,"py":0,"pz":0,"tx":0,"ty":0,"tz":0,"rx":0,"ry":0,"rz":0,"sx":1,"sy":1,"sz":1},
                            {"px":0,"py":0,"pz":0,"tx":0,"ty":2,"tz":0,"rx":0,"ry":0,"rz":45,"sx":1,"sy":1,"sz":1}
                        ]
                    }
                }
            ],
            "model": {
                "mesh": { "faces": [] },
                "keyframes": [
                    {"px":0,"py":0,"pz":0,"tx":0,"ty":0,"tz":0,"rx":0,"ry":0,"rz":0,"sx":1,"sy":1,"sz":1},
                    {"px":0,"py":0,"pz":0,"tx":5,"ty":0,"tz":0,"rx":0,"ry":90,"rz":0,"sx":1,"sy":1,"sz":1},
                    {"px":0,"py":0,"pz":0,"tx":5,"ty":5,"tz":0,"rx":0,"ry":180,"rz":0,"sx":1,"sy":1,"sz":1}
                ]
            }
        }
    ],
    "keyframes": [
        {"px":0,"py":0,"pz":0,"tx":0,"ty":0,"tz":0,"rx":0,"ry":0,"rz":0,"sx":1,"sy":1,"sz":1}
    ]
}"#;

fn main() -> Result<()> {
    env_logger::init();

    let settings = EditorSettings::default();
    let mut rig = settings.load_articulated(RIG)?;

    let camera = settings.camera(rig.center().truncate());
    let view = camera.look_at()?;
    let projection = settings.projections().project(kinetree::scene::ProjectionType::Perspective);
    let view_projection = projection * view;

    {
        let mut editor = rig.editor();
        if let Some(hand) = editor.articulated().find_by_component("hand") {
            editor.select(Selection::Node(hand))?;
            editor.insert_frame(2)?;
        }
        editor.toggle_auto_replay();
        editor.toggle_playing();
    }

    let applied = Transformation::IDENTITY;
    let ease = Easing::EaseInOutCubic;
    for frame in 0..=60u32 {
        let now_ms = f64::from(frame) * 1000.0 / 60.0;
        rig.frame(now_ms, &applied, ease.as_fn(), &mut |item: &RenderItem<'_>| {
            if frame % 15 == 0 {
                let p = item.world.translation();
                let clip = view_projection * item.world.col(3);
                println!(
                    "t={now_ms:7.1}ms {:indent$}{:<6} world=({:6.2}, {:6.2}, {:6.2}) clip_w={:.2}",
                    "",
                    item.component,
                    p.x,
                    p.y,
                    p.z,
                    clip.w,
                    indent = item.depth * 2,
                );
            }
        });
    }

    println!("{}", save_articulated_string(&rig)?);
    Ok(())
}

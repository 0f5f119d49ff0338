//! Fixture rendering
//!
//! A fixture references one or more sample globals per category. Every
//! reference the restriction rules should flag carries a suppression
//! directive, so a correctly configured lint run reports nothing and a wrong
//! one reports either the violation or the unused directive.

use crate::writer::CodeWriter;
use globalfence_core::{Category, FixtureSamples, Runtime, NO_RESTRICTED_GLOBALS, NO_UNUSED_VARS};
use globalfence_engine::policy;

/// Name written into the generated header
pub const GENERATOR: &str = "globalfence";

fn suppress(code: &mut CodeWriter, rule: &str) {
    code.comment([format!("eslint-disable-next-line {}", rule)]);
}

/// Render the fixture source for `runtime`
pub fn render_fixture(runtime: Runtime, samples: &FixtureSamples) -> String {
    let mut code = CodeWriter::new();

    code.doc_comment([
        format!("DO NOT EDIT: Generated by {}", GENERATOR),
        format!(
            "This file is used to check for globals that are allowed in the {} runtime.",
            runtime
        ),
        format!(
            "If you see lint errors in this file, it means the {} rules are not set up correctly",
            GENERATOR
        ),
    ]);
    code.blank();

    code.block("export default () => [", "];", |code| {
        for (index, category) in Category::ALL.into_iter().enumerate() {
            let permitted = policy::is_permitted(category, runtime);

            if index > 0 {
                code.blank();
            }
            code.doc_comment([format!(
                "{} globals should {}be available in a {} runtime.",
                category.label(),
                if permitted { "" } else { "NOT " },
                runtime
            )]);

            for name in samples.for_category(category) {
                if !permitted {
                    suppress(code, NO_RESTRICTED_GLOBALS);
                }
                code.line(format!("{},", name));
            }
        }

        if runtime == Runtime::Browser {
            code.blank();
            code.doc_comment([
                "window globals should never be available and should be accessed from the window object.",
                "Also local variables should be able to be declared with the same name as the window global.",
            ]);

            for name in &samples.window {
                suppress(code, NO_RESTRICTED_GLOBALS);
                code.line(format!("{},", name));
                code.line(format!("window.{},", name));
                suppress(code, NO_UNUSED_VARS);
                code.line(format!("(() => {{ const {} = '{}'; }}),", name, name));
            }
        }
    });

    code.finish()
}

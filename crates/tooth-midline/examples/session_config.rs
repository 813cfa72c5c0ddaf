//! Example: Analysis Session Configuration
//!
//! This example shows how to describe an analysis with `AnalysisConfig`,
//! round-trip it through TOML and JSON, and run it on a generated mesh.
//!
//! Run with: `cargo run --example session_config`

use std::io::Cursor;

use tooth_midline::{
    AnalysisConfig, AnalysisSession, AngleConvention, AxisMode, ComponentPolicy, PickTarget,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // =========================================================================
    // 1. Build a config programmatically
    // =========================================================================

    let config = AnalysisConfig {
        axis_mode: AxisMode::Skeleton,
        highlight_scale: 10.0,
        angle_convention: AngleConvention::PlaneToAxis,
        component_policy: ComponentPolicy::SourceComponent,
    };

    // =========================================================================
    // 2. Serialize to TOML and JSON
    // =========================================================================

    println!("=== TOML Output ===\n{}", config.to_toml()?);
    println!("=== JSON Output ===\n{}", config.to_json()?);

    // =========================================================================
    // 3. Parse a partial config; missing keys take defaults
    // =========================================================================

    let parsed = AnalysisConfig::from_toml(
        r#"
        axis_mode = "pca"
        angle_convention = "normal-to-axis"
        "#,
    )?;
    println!(
        "\n=== Parsed Config ===\nMode: {}\nScale: {}\nPolicy: {}",
        parsed.axis_mode, parsed.highlight_scale, parsed.component_policy
    );

    // =========================================================================
    // 4. Run both configs on a column-shaped test mesh
    // =========================================================================

    let obj = create_column_obj(6);

    for config in [parsed, config] {
        let mut session = AnalysisSession::from_obj_reader(&mut Cursor::new(&obj), config)?;
        let axis = session.extract_axis()?.clone();
        println!(
            "\n=== {} axis ===\nStart: {:?}\nEnd: {:?}\nPath points: {}",
            session.config().axis_mode,
            axis.start(),
            axis.end(),
            axis.path().len()
        );

        let result = session.analyze(PickTarget::Face(0))?;
        println!(
            "Face 0: {:.2}° ({})",
            result.angle(),
            result.convention
        );
    }

    Ok(())
}

/// Square column of `levels` rings, one unit apart, with capped ends.
fn create_column_obj(levels: u32) -> String {
    let mut obj = String::new();
    for z in 0..levels {
        for (x, y) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
            obj.push_str(&format!("v {} {} {}\n", x, y, z));
        }
    }
    for level in 0..levels - 1 {
        for k in 0..4 {
            // OBJ indices are 1-based.
            let a = 4 * level + k + 1;
            let b = 4 * level + (k + 1) % 4 + 1;
            obj.push_str(&format!("f {} {} {}\n", a, b, b + 4));
            obj.push_str(&format!("f {} {} {}\n", a, b + 4, a + 4));
        }
    }
    let top = 4 * (levels - 1);
    obj.push_str("f 1 3 2\nf 1 4 3\n");
    obj.push_str(&format!(
        "f {} {} {}\nf {} {} {}\n",
        top + 1,
        top + 2,
        top + 3,
        top + 1,
        top + 3,
        top + 4
    ));
    obj
}

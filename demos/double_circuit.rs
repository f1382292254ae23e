use line_emf::fields::{field_profile, EdgeMetric, EdgeTable};
use line_emf::geometry::{Conductor, ConductorSet, CrossSection};
use line_emf::optimize::{optimize_phasing, target_fields, BisectionCriteria, CircuitGrouping};

fn phase_wire(tag: &str, x: f64, y: f64, phase: f64) -> Conductor {
    Conductor {
        tag: tag.into(),
        frequency: 60.0,
        x,
        y,
        subconductors: 2,
        conductor_diameter: 1.108, // Drake ACSR, inches
        bundle_diameter: 18.0,
        voltage: 345.0,
        current: 600.0,
        phase,
    }
}

fn main() -> line_emf::errors::Result<()> {
    // Vertical double circuit on a 150 ft right-of-way, two shield wires.
    let hot = vec![
        phase_wire("1a", -21.0, 45.0, 0.0),
        phase_wire("1b", -20.0, 60.0, 120.0),
        phase_wire("1c", -19.0, 75.0, 240.0),
        phase_wire("2a", 21.0, 45.0, 0.0),
        phase_wire("2b", 20.0, 60.0, 120.0),
        phase_wire("2c", 19.0, 75.0, 240.0),
    ];
    let gnd = vec![
        Conductor::grounded("s1", 60.0, -12.0, 85.0, 0.5),
        Conductor::grounded("s2", 60.0, 12.0, 85.0, 0.5),
    ];
    let section = CrossSection {
        name: "double_circuit".into(),
        conductors: ConductorSet::new(hot, gnd)?,
        max_distance: 100.0,
        step: 0.5,
        sample_height: 3.28, // 1 m
        left_row: -75.0,
        right_row: 75.0,
    };

    let profile = field_profile(&section)?;
    let (left, right) = section.edge_indices();
    let edges = profile.edge_table(left, right);
    println!("edge, B_max(mG), E_max(kV/m)");
    println!("left, {:.6e}, {:.6e}", edges.bmax_left, edges.emax_left);
    println!("right, {:.6e}, {:.6e}", edges.bmax_right, edges.emax_right);

    // Best of the 36 phase arrangements, per edge metric.
    let optimum = optimize_phasing(&section, &CircuitGrouping::ConsecutiveTriples)?;
    println!();
    println!("metric, best_edge_value");
    for metric in EdgeMetric::ALL {
        println!("{}, {:.6e}", metric.label(), optimum.minima.get(metric));
    }
    println!();
    println!("tag, phase_for_bmax_left, phase_for_bmax_right, phase_for_emax_left, phase_for_emax_right");
    for row in &optimum.rows {
        println!(
            "{}, {}, {}, {}, {}",
            row.tag,
            row.phases.bmax_left,
            row.phases.bmax_right,
            row.phases.emax_left,
            row.phases.emax_right
        );
    }

    // Raise the whole tower set until the right-edge magnetic field halves.
    let mut targets = EdgeTable::from_fn(|_| None);
    targets.bmax_right = Some(edges.bmax_right / 2.0);
    let adjustment = target_fields(
        &section,
        &[0, 1, 2, 3, 4, 5],
        &[0, 1],
        &targets,
        &BisectionCriteria::default(),
    )?;
    if let Some(increment) = adjustment.increments.bmax_right {
        println!();
        println!("raise every conductor {increment:.3} ft to halve the right-edge B field");
    }
    Ok(())
}

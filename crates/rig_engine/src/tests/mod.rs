//! Scenario tests across the rig, panel, viewport and render loop

mod support;

mod panel_scenarios;

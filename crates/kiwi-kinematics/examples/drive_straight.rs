use kiwi_kinematics::*;

fn main() {
    let track_radius = KIWI_TRACK_RADIUS;
    let wheel_speeds = WheelSpeeds::new(0.5, 0.5); // 0.5 m/s on both wheels
    let dt = 0.1; // Time step in seconds
    let num_steps = 10;

    match DifferentialDrive::new(track_radius) {
        Ok(drive) => {
            let mut integrator = SingleTrackIntegrator::new(drive);

            println!("Initializing simulation...");
            println!("  {}", drive);
            println!("  Wheel Speeds: {}", wheel_speeds);
            println!("  Chassis Speeds: {}", drive.forward_kinematics(wheel_speeds));
            println!("  Time Step:    {} s", dt);
            println!("  Num Steps:    {}", num_steps);
            println!("\nSimulating...");

            for i in 0..num_steps {
                let state = integrator.integrate(wheel_speeds, dt);
                println!("Step {:>2}: State: {}", i + 1, state);
            }

            println!("\nSimulation complete.");
            println!("Final State: {:?}", integrator.state());
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {}", e);
            eprintln!("Please ensure track_radius ({}) is positive.", track_radius);
        }
    }
}

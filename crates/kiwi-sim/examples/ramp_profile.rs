use kiwi_core::messages::WheelSpeedRequest;
use kiwi_sim::SingleTrackModel;

fn main() {
    let model = SingleTrackModel::new();
    let dt = 0.1; // Time step in seconds
    let num_steps = 30;

    println!("Simulating a left wheel at rest and a right wheel ramping up...");

    for i in 0..num_steps {
        let t = (i + 1) as f32 * dt as f32;
        model.set_wheel_speed_left(WheelSpeedRequest { wheel_speed: 0.0 });
        model.set_wheel_speed_right(WheelSpeedRequest { wheel_speed: 0.5 * t / 3.0 });

        let state = model.step(dt);
        println!("Step {:>2}: Wheels: {} State: {}", i + 1, model.wheel_speeds(), state);
    }

    println!("\nSimulation complete.");
}

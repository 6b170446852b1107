use mesh_nn::{ActivationFunction, NetResult, Network};

/// Trains a 2-2-1 ReLU network on XOR with the delta rule and prints the
/// learned truth table.
fn main() -> NetResult<()> {
    let mut network = Network::new(1);
    network.create_input_unit();
    network.create_input_unit();
    network.create_hidden_unit(0, ActivationFunction::ReLU);
    network.create_hidden_unit(0, ActivationFunction::ReLU);
    network.create_output_unit(ActivationFunction::ReLU);
    network.build_dense_mesh(None, true, 1.0)?;

    let inputs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let references = [[0.0], [1.0], [1.0], [0.0]];

    let beta = 0.01;
    let max_epochs = 1_000_000;
    let max_error = 0.001;

    for epoch in 1..=max_epochs {
        for (input, reference) in inputs.iter().zip(references.iter()) {
            network.evaluate(input)?;
            network.learn(reference, beta)?;
        }

        let mut error = 0.0;
        for (input, reference) in inputs.iter().zip(references.iter()) {
            network.evaluate(input)?;
            error += (reference[0] - network.output(0)).powi(2);
        }

        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: error = {error:.6}");
        }
        if error < max_error {
            println!("Optimum found after {epoch} epochs (error = {error:.6})");
            break;
        }
        if epoch == max_epochs {
            println!("Optimum not found (error = {error:.6})");
        }
    }

    for input in &inputs {
        network.evaluate(input)?;
        println!("{} {} : {:.4}", input[0], input[1], network.output(0));
    }

    Ok(())
}

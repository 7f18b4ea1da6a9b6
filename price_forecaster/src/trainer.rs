//! Mini-batch training loop with a held-out validation tail.

use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    errors::ForecastError,
    model::{Adam, LstmNetwork, TrainConfig},
    window::TrainingWindow,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    pub epoch: usize,
    pub train_loss: f64,
    pub val_loss: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_windows: usize,
    pub val_windows: usize,
    pub epochs: Vec<EpochStats>,
}

impl TrainingReport {
    pub fn final_train_loss(&self) -> Option<f64> {
        self.epochs.last().map(|e| e.train_loss)
    }

    pub fn final_val_loss(&self) -> Option<f64> {
        self.epochs.last().and_then(|e| e.val_loss)
    }
}

/// Index at which the validation tail starts: `floor(n * (1 - split))`.
pub fn split_point(n: usize, validation_split: f64) -> usize {
    ((n as f64) * (1.0 - validation_split)).floor() as usize
}

/// Stacks windows into `[rows, look_back]` inputs and `[rows]` targets.
pub fn to_batch(windows: &[&TrainingWindow], look_back: usize) -> (Array2<f64>, Array1<f64>) {
    let mut inputs = Array2::zeros((windows.len(), look_back));
    for (mut row, w) in inputs.rows_mut().into_iter().zip(windows) {
        row.assign(&Array1::from_vec(w.inputs.clone()));
    }
    let targets = windows.iter().map(|w| w.target).collect();
    (inputs, targets)
}

fn mse(network: &LstmNetwork, windows: &[TrainingWindow], batch_size: usize) -> Option<f64> {
    if windows.is_empty() {
        return None;
    }
    let mut total = 0.0;
    for chunk in windows.chunks(batch_size) {
        let refs: Vec<&TrainingWindow> = chunk.iter().collect();
        let (x, y) = to_batch(&refs, network.look_back);
        total += network.loss(&x, &y) * chunk.len() as f64;
    }
    Some(total / windows.len() as f64)
}

/// Trains `network` in place on `windows` (sequence order) and returns the
/// per-epoch losses. The last `validation_split` share of windows is never
/// trained on.
pub fn train(
    network: &mut LstmNetwork,
    windows: &[TrainingWindow],
    cfg: &TrainConfig,
    rng: &mut StdRng,
) -> Result<TrainingReport, ForecastError> {
    cfg.validate()?;
    if let Some(w) = windows.iter().find(|w| w.inputs.len() != network.look_back) {
        return Err(ForecastError::ShapeMismatch {
            expected: network.look_back,
            found: w.inputs.len(),
        });
    }

    let split = split_point(windows.len(), cfg.validation_split);
    if split == 0 {
        return Err(ForecastError::EmptyTrainingSet {
            windows: windows.len(),
        });
    }
    let (train_set, val_set) = windows.split_at(split);

    let mut adam = Adam::new(cfg.learning_rate)
        .with_betas(cfg.beta1, cfg.beta2)
        .with_epsilon(cfg.epsilon);
    let mut order: Vec<usize> = (0..train_set.len()).collect();
    let mut report = TrainingReport {
        train_windows: train_set.len(),
        val_windows: val_set.len(),
        epochs: Vec::with_capacity(cfg.epochs),
    };

    info!(
        train = train_set.len(),
        val = val_set.len(),
        params = network.parameter_count(),
        "training"
    );

    for epoch in 1..=cfg.epochs {
        if cfg.shuffle {
            order.shuffle(rng);
        }

        let mut seen = 0usize;
        let mut loss_sum = 0.0;
        for idx in order.chunks(cfg.batch_size) {
            let batch: Vec<&TrainingWindow> = idx.iter().map(|&i| &train_set[i]).collect();
            let (x, y) = to_batch(&batch, network.look_back);

            let (loss, grads) = network.loss_and_gradients(&x, &y);
            network.apply_gradients(&grads, &mut adam);

            loss_sum += loss * batch.len() as f64;
            seen += batch.len();
        }
        let train_loss = loss_sum / seen as f64;
        let val_loss = mse(network, val_set, cfg.batch_size);

        info!(epoch, epochs = cfg.epochs, loss = train_loss, val_loss = ?val_loss, "epoch done");
        report.epochs.push(EpochStats {
            epoch,
            train_loss,
            val_loss,
        });
    }

    debug!(steps = adam.steps(), "optimizer finished");
    Ok(report)
}

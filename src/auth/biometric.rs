//! Biometric strategy: a strict three-step probe of the local device.
//! Hardware first, then supported modalities, then the verification
//! challenge. The sequence short-circuits on the first failing step and
//! nothing is retried; the challenge runs only when both probes pass.

use crate::auth::{FailureReason, Outcome};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// A biometric method the device can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Fingerprint,
    Face,
    Iris,
}

/// Device capability as reported at the start of an attempt. Queried fresh
/// every time; never cached across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiometricCapability {
    pub hardware_present: bool,
    pub modalities: HashSet<Modality>,
}

/// User-facing text shown by the device during the challenge.
#[derive(Debug, Clone)]
pub struct ChallengePrompt {
    pub message: String,
    pub fallback_label: String,
}

impl Default for ChallengePrompt {
    fn default() -> Self {
        Self {
            message: "Biometric authentication".to_string(),
            fallback_label: "Use password".to_string(),
        }
    }
}

/// Verdict of one device challenge. Cancellation and fallback both count as
/// not successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeVerdict {
    pub success: bool,
}

/// The device-local biometric service, consumed as an external collaborator.
#[async_trait]
pub trait BiometricDevice: Send + Sync {
    /// Whether the device has any biometric hardware at all.
    async fn has_hardware(&self) -> bool;

    /// The modalities the device can verify. May be empty even when
    /// hardware is present (nothing enrolled).
    async fn supported_modalities(&self) -> HashSet<Modality>;

    /// Run the verification challenge, showing `prompt` to the user.
    async fn challenge(&self, prompt: &ChallengePrompt) -> ChallengeVerdict;
}

/// Verifies the user's identity against device-local biometric hardware.
pub struct BiometricAuthenticator<D> {
    device: D,
    prompt: ChallengePrompt,
}

impl<D: BiometricDevice> BiometricAuthenticator<D> {
    pub fn new(device: D) -> Self {
        Self::with_prompt(device, ChallengePrompt::default())
    }

    pub fn with_prompt(device: D, prompt: ChallengePrompt) -> Self {
        Self { device, prompt }
    }

    /// Run one biometric attempt. Never returns an error: each terminal
    /// failure folds into `Outcome::Failure` with its own reason.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Outcome {
        if !self.device.has_hardware().await {
            debug!("device reports no biometric hardware");
            return Outcome::failure(FailureReason::NoHardware);
        }

        let modalities = self.device.supported_modalities().await;
        if modalities.is_empty() {
            debug!("biometric hardware present but no modality available");
            return Outcome::failure(FailureReason::NoModality);
        }

        let capability = BiometricCapability {
            hardware_present: true,
            modalities,
        };
        debug!("device capability: {capability:?}");

        let verdict = self.device.challenge(&self.prompt).await;
        if verdict.success {
            Outcome::Success
        } else {
            Outcome::failure(FailureReason::ChallengeFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted device: fixed probe answers, counts challenge invocations.
    struct FakeDevice {
        hardware: bool,
        modalities: HashSet<Modality>,
        verdict: bool,
        challenges: AtomicUsize,
    }

    impl FakeDevice {
        fn new(hardware: bool, modalities: &[Modality], verdict: bool) -> Arc<Self> {
            Arc::new(Self {
                hardware,
                modalities: modalities.iter().copied().collect(),
                verdict,
                challenges: AtomicUsize::new(0),
            })
        }

        fn challenges(&self) -> usize {
            self.challenges.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BiometricDevice for Arc<FakeDevice> {
        async fn has_hardware(&self) -> bool {
            self.hardware
        }

        async fn supported_modalities(&self) -> HashSet<Modality> {
            self.modalities.clone()
        }

        async fn challenge(&self, _prompt: &ChallengePrompt) -> ChallengeVerdict {
            self.challenges.fetch_add(1, Ordering::SeqCst);
            ChallengeVerdict {
                success: self.verdict,
            }
        }
    }

    #[tokio::test]
    async fn test_no_hardware_short_circuits() {
        let device = FakeDevice::new(false, &[Modality::Fingerprint], true);
        let outcome = BiometricAuthenticator::new(Arc::clone(&device)).authenticate().await;

        assert_eq!(outcome, Outcome::failure(FailureReason::NoHardware));
        assert_eq!(device.challenges(), 0);
    }

    #[tokio::test]
    async fn test_no_modality_short_circuits() {
        let device = FakeDevice::new(true, &[], true);
        let outcome = BiometricAuthenticator::new(Arc::clone(&device)).authenticate().await;

        assert_eq!(outcome, Outcome::failure(FailureReason::NoModality));
        assert_eq!(device.challenges(), 0);
    }

    #[tokio::test]
    async fn test_challenge_success() {
        let device = FakeDevice::new(true, &[Modality::Fingerprint], true);
        let outcome = BiometricAuthenticator::new(Arc::clone(&device)).authenticate().await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(device.challenges(), 1);
    }

    #[tokio::test]
    async fn test_challenge_failure_or_fallback() {
        let device = FakeDevice::new(true, &[Modality::Face, Modality::Iris], false);
        let outcome = BiometricAuthenticator::new(Arc::clone(&device)).authenticate().await;

        assert_eq!(outcome, Outcome::failure(FailureReason::ChallengeFailed));
        assert_eq!(device.challenges(), 1);
    }

    #[tokio::test]
    async fn test_prompt_reaches_device() {
        struct PromptCheck;

        #[async_trait]
        impl BiometricDevice for PromptCheck {
            async fn has_hardware(&self) -> bool {
                true
            }

            async fn supported_modalities(&self) -> HashSet<Modality> {
                [Modality::Fingerprint].into_iter().collect()
            }

            async fn challenge(&self, prompt: &ChallengePrompt) -> ChallengeVerdict {
                ChallengeVerdict {
                    success: prompt.message == "Unlock the vault"
                        && prompt.fallback_label == "Use password",
                }
            }
        }

        let prompt = ChallengePrompt {
            message: "Unlock the vault".to_string(),
            ..ChallengePrompt::default()
        };
        let outcome = BiometricAuthenticator::with_prompt(PromptCheck, prompt)
            .authenticate()
            .await;

        assert_eq!(outcome, Outcome::Success);
    }
}

//! HK32F0301MxxC register map

/// Reset and clock control
pub mod rcc {
    pub const BASE: u32 = 0x4002_1000;
    pub const AHBENR: u32 = BASE + 0x14;
    pub const APB2ENR: u32 = BASE + 0x18;
    pub const APB1ENR: u32 = BASE + 0x1C;

    pub const AHB_IOPA: u32 = 1 << 17;
    pub const AHB_IOPB: u32 = 1 << 18;
    pub const AHB_IOPC: u32 = 1 << 19;
    pub const AHB_IOPD: u32 = 1 << 20;

    pub const APB2_SYSCFG: u32 = 1 << 0;
    pub const APB2_UART1: u32 = 1 << 14;

    pub const APB1_PWR: u32 = 1 << 28;
}

/// GPIO port, offsets from the port base
pub mod gpio {
    pub const MODER: u32 = 0x00;
    pub const OTYPER: u32 = 0x04;
    pub const OSPEEDR: u32 = 0x08;
    pub const PUPDR: u32 = 0x0C;
    pub const IDR: u32 = 0x10;
    pub const ODR: u32 = 0x14;
    pub const BSRR: u32 = 0x18;
    pub const AFRL: u32 = 0x20;
    pub const BRR: u32 = 0x28;

    pub const MODE_INPUT: u32 = 0b00;
    pub const MODE_OUTPUT: u32 = 0b01;
    pub const MODE_AF: u32 = 0b10;
    pub const MODE_ANALOG: u32 = 0b11;

    pub const PULL_NONE: u32 = 0b00;
    pub const PULL_UP: u32 = 0b01;
    pub const PULL_DOWN: u32 = 0b10;

    pub const SPEED_LEVEL_3: u32 = 0b11;
}

/// External interrupt controller
pub mod exti {
    pub const BASE: u32 = 0x4001_0400;
    pub const IMR: u32 = BASE + 0x00;
    pub const EMR: u32 = BASE + 0x04;
    pub const RTSR: u32 = BASE + 0x08;
    pub const FTSR: u32 = BASE + 0x0C;
    /// Pending register, write one to clear
    pub const PR: u32 = BASE + 0x14;
}

/// System configuration
pub mod syscfg {
    pub const BASE: u32 = 0x4001_0000;
    /// EXTICR1..EXTICR2, four lines per register
    pub const EXTICR1: u32 = BASE + 0x08;
}

/// UART1
pub mod uart {
    pub const BASE: u32 = 0x4001_3800;
    pub const CR1: u32 = BASE + 0x00;
    pub const BRR: u32 = BASE + 0x0C;
    pub const ISR: u32 = BASE + 0x1C;
    pub const TDR: u32 = BASE + 0x28;

    pub const CR1_UE: u32 = 1 << 0;
    pub const CR1_TE: u32 = 1 << 3;

    pub const ISR_TXE: u32 = 1 << 7;
}

/// Cortex-M0 SysTick
pub mod systick {
    pub const CTRL: u32 = 0xE000_E010;
    pub const LOAD: u32 = 0xE000_E014;
    pub const VAL: u32 = 0xE000_E018;

    /// Enable, interrupt, processor clock
    pub const CTRL_RUN: u32 = 0b111;
}

/// System control block
pub mod scb {
    /// SysTick priority lives in the top byte
    pub const SHPR3: u32 = 0xE000_ED20;
}

/// Nested vectored interrupt controller
pub mod nvic {
    pub const ISER: u32 = 0xE000_E100;
    pub const ICER: u32 = 0xE000_E180;
    pub const IPR: u32 = 0xE000_E400;

    /// Implemented priority bits (top of each byte)
    pub const PRIO_BITS: u32 = 2;
}

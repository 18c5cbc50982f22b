//! CH32V20x register map
//!
//! Absolute addresses for fixed blocks, offsets for blocks that come from
//! the peripheral tables in [`crate::config`].

/// Reset and clock control
pub mod rcc {
    pub const BASE: u32 = 0x4002_1000;
    pub const CFGR0: u32 = BASE + 0x04;
    pub const AHBPCENR: u32 = BASE + 0x14;
    pub const APB2PCENR: u32 = BASE + 0x18;
    pub const APB1PCENR: u32 = BASE + 0x1C;

    /// ADC prescaler field of CFGR0
    pub const CFGR0_ADCPRE: u32 = 0b11 << 14;
    /// PCLK2 / 8
    pub const ADCPRE_DIV8: u32 = 0b11;

    pub const AHB_DMA1: u32 = 1 << 0;

    pub const APB2_AFIO: u32 = 1 << 0;
    pub const APB2_IOPA: u32 = 1 << 2;
    pub const APB2_IOPB: u32 = 1 << 3;
    pub const APB2_IOPC: u32 = 1 << 4;
    pub const APB2_IOPD: u32 = 1 << 5;
    pub const APB2_IOPE: u32 = 1 << 6;
    pub const APB2_ADC1: u32 = 1 << 9;
    pub const APB2_TIM1: u32 = 1 << 11;
    pub const APB2_SPI1: u32 = 1 << 12;
    pub const APB2_USART1: u32 = 1 << 14;

    pub const APB1_USART2: u32 = 1 << 17;
    pub const APB1_USART3: u32 = 1 << 18;
}

/// GPIO port, offsets from the port base
pub mod gpio {
    pub const CFGLR: u32 = 0x00;
    pub const CFGHR: u32 = 0x04;
    pub const INDR: u32 = 0x08;
    pub const OUTDR: u32 = 0x0C;
    pub const BSHR: u32 = 0x10;
    pub const BCR: u32 = 0x14;

    /// Output mode, 50 MHz
    pub const MODE_OUT_50MHZ: u32 = 0b11;
    pub const MODE_INPUT: u32 = 0b00;

    pub const CNF_OUT_PP: u32 = 0b00;
    pub const CNF_OUT_OD: u32 = 0b01;
    pub const CNF_AF_PP: u32 = 0b10;
    pub const CNF_AF_OD: u32 = 0b11;

    pub const CNF_IN_ANALOG: u32 = 0b00;
    pub const CNF_IN_FLOATING: u32 = 0b01;
    pub const CNF_IN_PULL: u32 = 0b10;
}

/// ADC1
pub mod adc {
    pub const BASE: u32 = 0x4001_2400;
    pub const STATR: u32 = BASE + 0x00;
    pub const CTLR1: u32 = BASE + 0x04;
    pub const CTLR2: u32 = BASE + 0x08;
    pub const SAMPTR1: u32 = BASE + 0x0C;
    pub const SAMPTR2: u32 = BASE + 0x10;
    pub const RSQR1: u32 = BASE + 0x2C;
    pub const RSQR3: u32 = BASE + 0x34;
    pub const RDATAR: u32 = BASE + 0x4C;

    pub const STATR_EOC: u32 = 1 << 1;

    pub const CTLR1_EOCIE: u32 = 1 << 5;
    pub const CTLR1_SCAN: u32 = 1 << 8;
    pub const CTLR1_DUALMOD: u32 = 0xF << 16;
    pub const CTLR1_BUFEN: u32 = 1 << 26;

    pub const CTLR2_ADON: u32 = 1 << 0;
    pub const CTLR2_CONT: u32 = 1 << 1;
    pub const CTLR2_CAL: u32 = 1 << 2;
    pub const CTLR2_RSTCAL: u32 = 1 << 3;
    pub const CTLR2_ALIGN: u32 = 1 << 11;
    pub const CTLR2_EXTSEL: u32 = 0b111 << 17;
    pub const CTLR2_EXTTRIG: u32 = 1 << 20;
    pub const CTLR2_SWSTART: u32 = 1 << 22;
    pub const CTLR2_TSVREFE: u32 = 1 << 23;

    /// Regular sequence length field (L)
    pub const RSQR1_L: u32 = 0xF << 20;
    /// First regular conversion (SQ1)
    pub const RSQR3_SQ1: u32 = 0x1F;

    pub const SAMPLE_13_5: u32 = 0b010;
    pub const SAMPLE_239_5: u32 = 0b111;

    pub const CHANNEL_TEMP_SENSOR: u32 = 16;
    pub const CHANNEL_VREFINT: u32 = 17;
}

/// DMA1
pub mod dma {
    pub const BASE: u32 = 0x4002_0000;
    pub const INTFR: u32 = BASE + 0x00;
    pub const INTFCR: u32 = BASE + 0x04;

    // Channel registers, offsets from the channel base
    pub const CFGR: u32 = 0x00;
    pub const CNTR: u32 = 0x04;
    pub const PADDR: u32 = 0x08;
    pub const MADDR: u32 = 0x0C;

    pub const CFGR_EN: u32 = 1 << 0;
    pub const CFGR_DIR: u32 = 1 << 4;
    pub const CFGR_CIRC: u32 = 1 << 5;
    pub const CFGR_PINC: u32 = 1 << 6;
    pub const CFGR_MINC: u32 = 1 << 7;
    pub const CFGR_PSIZE: u32 = 0b11 << 8;
    pub const CFGR_MSIZE: u32 = 0b11 << 10;
    pub const CFGR_PL: u32 = 0b11 << 12;
    pub const CFGR_MEM2MEM: u32 = 1 << 14;
    /// Bits rewritten by a channel init; EN and the interrupt enables survive
    pub const CFGR_CLEAR_MASK: u32 = 0x7FF0;

    pub const PRIORITY_VERY_HIGH: u32 = 0b11;
}

/// TIM1, advanced timer
pub mod tim1 {
    pub const BASE: u32 = 0x4001_2C00;
    pub const CTLR1: u32 = BASE + 0x00;
    pub const SWEVGR: u32 = BASE + 0x14;
    pub const CHCTLR1: u32 = BASE + 0x18;
    pub const CCER: u32 = BASE + 0x20;
    pub const PSC: u32 = BASE + 0x28;
    pub const ATRLR: u32 = BASE + 0x2C;
    pub const RPTCR: u32 = BASE + 0x30;
    pub const CH1CVR: u32 = BASE + 0x34;
    pub const BDTR: u32 = BASE + 0x44;

    pub const CTLR1_CEN: u32 = 1 << 0;
    pub const CTLR1_DIR: u32 = 1 << 4;
    pub const CTLR1_CMS: u32 = 0b11 << 5;
    pub const CTLR1_ARPE: u32 = 1 << 7;
    pub const CTLR1_CKD: u32 = 0b11 << 8;

    pub const SWEVGR_UG: u32 = 1 << 0;

    pub const CHCTLR1_CC1S: u32 = 0b11;
    pub const CHCTLR1_OC1PE: u32 = 1 << 3;
    pub const CHCTLR1_OC1M: u32 = 0b111 << 4;
    pub const OC_MODE_PWM1: u32 = 0b110;

    pub const CCER_CC1E: u32 = 1 << 0;
    pub const CCER_CC1P: u32 = 1 << 1;

    pub const BDTR_MOE: u32 = 1 << 15;
}

/// SPI, offsets from the bus base
pub mod spi {
    pub const CTLR1: u32 = 0x00;
    pub const STATR: u32 = 0x08;
    pub const DATAR: u32 = 0x0C;
    pub const CRCR: u32 = 0x10;

    pub const CTLR1_CPHA: u32 = 1 << 0;
    pub const CTLR1_CPOL: u32 = 1 << 1;
    pub const CTLR1_MSTR: u32 = 1 << 2;
    pub const CTLR1_BR: u32 = 0b111 << 3;
    pub const CTLR1_SPE: u32 = 1 << 6;
    pub const CTLR1_LSBFIRST: u32 = 1 << 7;
    pub const CTLR1_SSI: u32 = 1 << 8;
    pub const CTLR1_SSM: u32 = 1 << 9;
    /// Bits kept across a bus init
    pub const CTLR1_CLEAR_MASK: u32 = 0x3040;

    pub const STATR_RXNE: u32 = 1 << 0;
    pub const STATR_TXE: u32 = 1 << 1;

    /// PCLK / 32
    pub const BR_DIV32: u32 = 0b100;
    pub const CRC_POLYNOMIAL: u32 = 7;
}

/// USART, offsets from the port base
pub mod usart {
    pub const STATR: u32 = 0x00;
    pub const DATAR: u32 = 0x04;
    pub const BRR: u32 = 0x08;
    pub const CTLR1: u32 = 0x0C;
    pub const CTLR2: u32 = 0x10;
    pub const CTLR3: u32 = 0x14;

    pub const STATR_RXNE: u32 = 1 << 5;
    pub const STATR_TC: u32 = 1 << 6;
    pub const STATR_TXE: u32 = 1 << 7;

    pub const CTLR1_RE: u32 = 1 << 2;
    pub const CTLR1_TE: u32 = 1 << 3;
    pub const CTLR1_RXNEIE: u32 = 1 << 5;
    pub const CTLR1_PS: u32 = 1 << 9;
    pub const CTLR1_PCE: u32 = 1 << 10;
    pub const CTLR1_M: u32 = 1 << 12;
    pub const CTLR1_UE: u32 = 1 << 13;

    pub const CTLR2_STOP: u32 = 0b11 << 12;
    pub const CTLR3_RTSE: u32 = 1 << 8;
    pub const CTLR3_CTSE: u32 = 1 << 9;
}

/// System timer
pub mod systick {
    pub const BASE: u32 = 0xE000_F000;
    pub const CTLR: u32 = BASE + 0x00;
    pub const SR: u32 = BASE + 0x04;
    pub const CNTL: u32 = BASE + 0x08;
    pub const CNTH: u32 = BASE + 0x0C;
    pub const CMPL: u32 = BASE + 0x10;
    pub const CMPH: u32 = BASE + 0x14;

    /// Enable, interrupt, HCLK source, auto reload
    pub const CTLR_RUN: u32 = 0x0F;

    pub const IRQ: u8 = 12;
}

/// Programmable fast interrupt controller
pub mod pfic {
    pub const IENR: u32 = 0xE000_E100;
    pub const IRER: u32 = 0xE000_E180;
    pub const IPRIOR: u32 = 0xE000_E400;
    pub const SCTLR: u32 = 0xE000_ED10;

    /// Wake on any event or interrupt, WFI behaves as WFE
    pub const SCTLR_SEVONPEND: u32 = 1 << 4;
    pub const SCTLR_WFITOWFE: u32 = 1 << 3;

    pub const IRQ_ADC1_2: u8 = 34;
    pub const IRQ_USART1: u8 = 53;
    pub const IRQ_USART2: u8 = 54;
    pub const IRQ_USART3: u8 = 55;
}
